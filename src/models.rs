use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

fn default_addr() -> String {
    "0.0.0.0:3009".to_string()
}

/// Where the document store keeps its collections. `None` keeps everything in memory.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub path: Option<std::path::PathBuf>,
}

/// Days the gym runs classes on. There is no Sunday programming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Weekday {
    #[serde(rename = "lunes")]
    Lunes,
    #[serde(rename = "martes")]
    Martes,
    #[serde(rename = "miércoles")]
    Miercoles,
    #[serde(rename = "jueves")]
    Jueves,
    #[serde(rename = "viernes")]
    Viernes,
    #[serde(rename = "sábado")]
    Sabado,
}

impl Weekday {
    pub const ALL: [Weekday; 6] = [
        Weekday::Lunes,
        Weekday::Martes,
        Weekday::Miercoles,
        Weekday::Jueves,
        Weekday::Viernes,
        Weekday::Sabado,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Lunes => "lunes",
            Weekday::Martes => "martes",
            Weekday::Miercoles => "miércoles",
            Weekday::Jueves => "jueves",
            Weekday::Viernes => "viernes",
            Weekday::Sabado => "sábado",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Trainer,
    Affiliate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Inactive,
            UserStatus::Inactive => UserStatus::Active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub subscription: Option<Uuid>,
}

impl User {
    /// Name shown next to the classes a trainer runs.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// A recurring class: runs on every listed day at every listed hour.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub trainer: Uuid,
    #[serde(default)]
    pub days: Vec<Weekday>,
    #[serde(default)]
    pub schedule: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlan {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub trainer: Uuid,
    #[serde(default)]
    pub affiliates: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_serializes_to_spanish_names() {
        let json = serde_json::to_string(&Weekday::ALL).unwrap();
        assert_eq!(
            json,
            r#"["lunes","martes","miércoles","jueves","viernes","sábado"]"#
        );
    }

    #[test]
    fn test_weekday_rejects_sunday() {
        assert!(serde_json::from_str::<Weekday>(r#""domingo""#).is_err());
        assert_eq!(
            serde_json::from_str::<Weekday>(r#""sábado""#).unwrap(),
            Weekday::Sabado
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.server.addr, "0.0.0.0:3009");
        assert!(cfg.store.path.is_none());
    }

    #[test]
    fn test_user_defaults_and_display_name() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "Ana",
            "surname": "García",
            "email": "ana@example.com",
            "role": "trainer"
        }))
        .unwrap();
        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.subscription, None);
        assert_eq!(user.display_name(), "Ana García");
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(UserStatus::Active.toggled(), UserStatus::Inactive);
        assert_eq!(UserStatus::Inactive.toggled(), UserStatus::Active);
    }
}
