//! Loading and validation of the controller configuration file.

use std::collections::HashSet;
use std::path::Path;

use kombiner_api::Configuration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Reads the configuration from the given file. Decoding is strict, unknown
/// fields fail the load.
pub fn load(path: &Path) -> Result<Configuration, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let cfg: Configuration = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Startup validation of the declared queues: at least one queue, non-empty
/// unique scheduler names, positive weights and sizes. All problems are
/// reported at once, field-path style.
pub fn validate(cfg: &Configuration) -> Result<(), ConfigError> {
    let mut errs = Vec::new();

    if cfg.queues.is_empty() {
        errs.push("queues: must be non-empty".to_string());
    }

    let mut seen = HashSet::new();
    for (idx, queue) in cfg.queues.iter().enumerate() {
        if queue.scheduler_name.is_empty() {
            errs.push(format!("queues[{idx}].schedulerName: must be non-empty"));
        } else if !seen.insert(queue.scheduler_name.clone()) {
            errs.push(format!(
                "queues[{idx}].schedulerName: duplicate scheduler name {:?}",
                queue.scheduler_name
            ));
        }
        if queue.weight < 1 {
            errs.push(format!("queues[{idx}].weight: must be a positive integer"));
        }
        if queue.max_size < 1 {
            errs.push(format!("queues[{idx}].maxSize: must be a positive integer"));
        }
    }

    if errs.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(errs.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use kombiner_api::Queue;

    use super::*;

    fn queue(name: &str, weight: u32, max_size: usize) -> Queue {
        Queue {
            scheduler_name: name.to_string(),
            weight,
            max_size,
            plugins: Default::default(),
        }
    }

    #[test]
    fn accepts_a_well_formed_configuration() {
        let cfg = Configuration {
            queues: vec![queue("sched-a", 10, 100), queue("sched-b", 1, 1)],
            ..Default::default()
        };
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn rejects_an_empty_queue_list() {
        let cfg = Configuration::default();
        let err = validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("queues: must be non-empty"));
    }

    #[test]
    fn rejects_a_missing_scheduler_name() {
        let cfg = Configuration {
            queues: vec![queue("", 1, 1)],
            ..Default::default()
        };
        let err = validate(&cfg).unwrap_err();
        assert!(err
            .to_string()
            .contains("queues[0].schedulerName: must be non-empty"));
    }

    #[test]
    fn rejects_duplicate_scheduler_names() {
        let cfg = Configuration {
            queues: vec![queue("sched-a", 1, 1), queue("sched-a", 2, 2)],
            ..Default::default()
        };
        let err = validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("duplicate scheduler name"));
    }

    #[test]
    fn rejects_non_positive_weight_and_size() {
        let cfg = Configuration {
            queues: vec![queue("sched-a", 0, 0)],
            ..Default::default()
        };
        let err = validate(&cfg).unwrap_err().to_string();
        assert!(err.contains("queues[0].weight: must be a positive integer"));
        assert!(err.contains("queues[0].maxSize: must be a positive integer"));
    }

    #[test]
    fn load_parses_a_configuration_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "queues:\n- schedulerName: sched-a\n  weight: 3\n  maxSize: 50\nfairnessAlgorithm: Uniform\n"
        )
        .unwrap();

        let cfg = load(file.path()).unwrap();
        assert_eq!(cfg.queues.len(), 1);
        assert_eq!(cfg.queues[0].weight, 3);
        assert_eq!(
            cfg.fairness_algorithm,
            kombiner_api::FairnessAlgorithm::Uniform
        );
    }

    #[test]
    fn load_rejects_unknown_fields() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "queues: []\nunknownKnob: 42\n").unwrap();
        assert!(matches!(load(file.path()), Err(ConfigError::Parse(_))));
    }
}
