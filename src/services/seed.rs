//! One-time demo data for a fresh storage.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use crate::db::Store;
use crate::domain::{Clock, RequestId, Role, UserId};
use crate::models::{Category, Request, RequestStatus, User};

fn demo_user(
    id: i64,
    login: &str,
    password: &str,
    (first_name, last_name): (&str, &str),
    email: &str,
    role: Role,
    now: DateTime<Utc>,
) -> User {
    User {
        id: UserId::new(id),
        login: login.to_string(),
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        middle_name: None,
        phone: None,
        subscribe_news: false,
        role,
        registration_date: Some(now),
        password: password.to_string(),
    }
}

#[must_use]
pub fn demo_users(now: DateTime<Utc>) -> Vec<User> {
    vec![
        demo_user(
            1,
            "admin",
            "admin",
            ("Администратор", "Системы"),
            "admin@softbuy.ru",
            Role::Admin,
            now,
        ),
        demo_user(
            2,
            "user",
            "user123",
            ("Иван", "Иванов"),
            "ivanov@example.com",
            Role::User,
            now,
        ),
        demo_user(
            3,
            "petrov",
            "petrov123",
            ("Петр", "Петров"),
            "petrov@example.com",
            Role::User,
            now,
        ),
    ]
}

fn at(month: u32, day: u32, hour: u32, min: u32) -> Result<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(2024, month, day)
        .and_then(|d| d.and_hms_opt(hour, min, 0))
        .map(|dt| dt.and_utc())
        .context("invalid demo timestamp")
}

pub fn demo_requests() -> Result<Vec<Request>> {
    let base = |id: i64,
                user: i64,
                title: &str,
                description: &str,
                category: Category,
                created: DateTime<Utc>| Request {
        id: RequestId::new(id),
        user_id: UserId::new(user),
        title: title.to_string(),
        description: description.to_string(),
        category,
        status: RequestStatus::New,
        created_at: created,
        solved_at: None,
        rejected_at: None,
        rejection_reason: None,
    };

    let installation = base(
        1001,
        2,
        "Не устанавливается Windows 11",
        "При попытке установки Windows 11 появляется ошибка \"This PC can't run Windows 11\". \
         Процессор: Intel Core i5, ОЗУ: 8 ГБ, SSD: 256 ГБ.",
        Category::Installation,
        at(3, 20, 14, 30)?,
    );

    let license = Request {
        status: RequestStatus::Solved,
        solved_at: Some(at(3, 19, 16, 45)?),
        ..base(
            1002,
            3,
            "Проблема с лицензионным ключом",
            "Купленный лицензионный ключ для Microsoft Office не принимается при активации. \
             Ошибка: \"Недействительный ключ продукта\".",
            Category::License,
            at(3, 18, 10, 15)?,
        )
    };

    let bug = Request {
        status: RequestStatus::Rejected,
        rejected_at: Some(at(3, 16, 11, 20)?),
        rejection_reason: Some(
            "Проблема связана с устаревшими драйверами видеокарты. \
             Обновите драйвера и попробуйте снова."
                .to_string(),
        ),
        ..base(
            1003,
            2,
            "Ошибка в Photoshop при сохранении",
            "При сохранении файлов в формате PNG Photoshop вылетает с ошибкой \
             \"Could not complete your request because of a program error\". Версия: Photoshop 2024.",
            Category::Bug,
            at(3, 15, 9, 45)?,
        )
    };

    let update = base(
        1004,
        3,
        "Нужна помощь с обновлением антивируса",
        "Не могу обновить базы данных Kaspersky. Выдает ошибку соединения, \
         хотя интернет работает нормально.",
        Category::Update,
        at(3, 22, 16, 20)?,
    );

    Ok(vec![installation, license, bug, update])
}

/// Writes the demo users and requests unless storage was already initialized.
///
/// Returns `true` if data was written.
pub async fn seed_demo_data(store: &Store, clock: &dyn Clock) -> Result<bool> {
    if store.is_data_initialized().await? {
        debug!("Demo data already initialized");
        return Ok(false);
    }

    let users = demo_users(clock.now());
    let requests = demo_requests()?;

    store
        .save_users(&users)
        .await
        .context("Failed to seed demo users")?;
    store
        .save_requests(&requests)
        .await
        .context("Failed to seed demo requests")?;
    store.mark_data_initialized().await?;

    info!(
        users = users.len(),
        requests = requests.len(),
        "Demo data initialized"
    );
    Ok(true)
}
