//! Settings display and update handler.

use anyhow::{Result, bail};

use songforge_core::settings::SettingsUpdate;

use crate::bootstrap::CliContext;

/// Execute the settings command.
///
/// Without `--set` pairs, prints the current settings. With them, applies a
/// partial update; an empty value clears the field
/// (`--set output_dir=` resets to the default).
pub async fn execute(ctx: &CliContext, set: Vec<String>) -> Result<()> {
    if set.is_empty() {
        let settings = ctx.settings.get().await?;
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let mut update = SettingsUpdate::default();
    for pair in &set {
        apply_pair(&mut update, pair)?;
    }

    let updated = ctx.settings.update(update).await?;
    println!("{}", serde_json::to_string_pretty(&updated)?);
    Ok(())
}

fn apply_pair(update: &mut SettingsUpdate, pair: &str) -> Result<()> {
    let Some((key, value)) = pair.split_once('=') else {
        bail!("expected key=value, got '{pair}'");
    };
    let key = key.trim();
    let value = value.trim();
    let cleared = value.is_empty();

    match key {
        "output_dir" => {
            update.output_dir = Some(if cleared { None } else { Some(value.to_string()) });
        }
        "model_version" => {
            update.model_version = Some(if cleared {
                None
            } else {
                Some(value.parse().map_err(anyhow::Error::msg)?)
            });
        }
        "device" => {
            update.device = Some(if cleared {
                None
            } else {
                Some(value.parse().map_err(anyhow::Error::msg)?)
            });
        }
        "dtype" => {
            update.dtype = Some(if cleared {
                None
            } else {
                Some(value.parse().map_err(anyhow::Error::msg)?)
            });
        }
        "auto_load" => {
            update.auto_load = Some(if cleared { None } else { Some(parse_bool(value)?) });
        }
        "timestamp_outputs" => {
            update.timestamp_outputs = Some(if cleared { None } else { Some(parse_bool(value)?) });
        }
        "lazy_load" => {
            update.lazy_load = Some(if cleared { None } else { Some(parse_bool(value)?) });
        }
        "theme" => {
            update.theme = Some(if cleared { None } else { Some(value.to_string()) });
        }
        other => bail!(
            "unknown setting '{other}' (expected one of: output_dir, model_version, device, \
             dtype, auto_load, timestamp_outputs, lazy_load, theme)"
        ),
    }
    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songforge_core::domain::Device;

    #[test]
    fn test_apply_pair_sets_and_clears() {
        let mut update = SettingsUpdate::default();
        apply_pair(&mut update, "device=cpu").unwrap();
        assert_eq!(update.device, Some(Some(Device::Cpu)));

        apply_pair(&mut update, "output_dir=").unwrap();
        assert_eq!(update.output_dir, Some(None));

        apply_pair(&mut update, "timestamp_outputs=off").unwrap();
        assert_eq!(update.timestamp_outputs, Some(Some(false)));
    }

    #[test]
    fn test_apply_pair_rejects_junk() {
        let mut update = SettingsUpdate::default();
        assert!(apply_pair(&mut update, "no-equals-sign").is_err());
        assert!(apply_pair(&mut update, "volume=11").is_err());
        assert!(apply_pair(&mut update, "device=tpu").is_err());
        assert!(apply_pair(&mut update, "auto_load=maybe").is_err());
    }
}
