use pettycash_core::{
    Department, DomainEvent, DomainEventKind, PettyCashConfig, PettyCashError, Result,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::FloatDesk;

/// Audit stream for configuration changes.
pub const SETTINGS_STREAM: Uuid = Uuid::nil();

impl FloatDesk {
    /// The active configuration, falling back to defaults before the
    /// first save.
    pub async fn configuration(&self) -> PettyCashConfig {
        self.books.read().await.config()
    }

    /// Replaces the single configuration record.
    pub async fn save_configuration(
        &self,
        config: PettyCashConfig,
        actor: &str,
    ) -> Result<PettyCashConfig> {
        config.validate()?;
        let mut books = self.books.write().await;
        let previous = books.config.replace(config.clone());

        self.record(
            DomainEvent::new(
                SETTINGS_STREAM,
                DomainEventKind::ConfigurationChanged,
                actor,
                format!("Configuration \"{}\" saved", config.name),
            )
            .with_payload(json!({ "previous": previous, "current": config })),
        )
        .await?;
        info!(allow_cross_department = config.allow_cross_department, %actor, "configuration saved");
        Ok(config)
    }

    pub async fn save_department(&self, department: Department) -> Result<Department> {
        let name = department.name.trim().to_string();
        if name.is_empty() {
            return Err(PettyCashError::invalid("Department name is required."));
        }
        let department = Department { name, ..department };
        self.books
            .write()
            .await
            .departments
            .insert(department.name.clone(), department.clone());
        Ok(department)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn configuration_is_a_single_record() {
        let desk = FloatDesk::in_memory();
        assert_eq!(desk.configuration().await, PettyCashConfig::default());

        desk.save_configuration(
            PettyCashConfig {
                default_iou_due_days: 14,
                ..PettyCashConfig::default()
            },
            "admin",
        )
        .await
        .unwrap();
        desk.save_configuration(
            PettyCashConfig {
                name: "Head Office".to_string(),
                default_iou_due_days: 7,
                ..PettyCashConfig::default()
            },
            "admin",
        )
        .await
        .unwrap();

        let config = desk.configuration().await;
        assert_eq!(config.name, "Head Office");
        assert_eq!(config.default_iou_due_days, 7);
        assert_eq!(desk.audit_trail(SETTINGS_STREAM).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn blank_configuration_name_is_refused() {
        let desk = FloatDesk::in_memory();
        let config = PettyCashConfig {
            name: " ".to_string(),
            ..PettyCashConfig::default()
        };
        assert!(matches!(
            desk.save_configuration(config, "admin").await,
            Err(PettyCashError::InvalidConfiguration(_))
        ));
    }
}
