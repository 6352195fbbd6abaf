use crate::error::{RenotaxError, Result};
use crate::types::config::RenotaxConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "renotax.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".renotax/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/renotax/config.toml";

/// Loads layered configuration for `root`. Without a project file the statutory
/// defaults apply and `None` is returned.
pub fn load_config(root: &Path) -> Result<Option<RenotaxConfig>> {
    let global =
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

/// Candidate config files for `root`, lowest precedence first.
pub fn config_layers(root: &Path, global_path: Option<&Path>) -> Vec<PathBuf> {
    global_path
        .map(Path::to_path_buf)
        .into_iter()
        .chain([root.join(DEFAULT_CONFIG_FILE), root.join(DEFAULT_LOCAL_FILE)])
        .collect()
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<RenotaxConfig>> {
    if !root.join(DEFAULT_CONFIG_FILE).is_file() {
        return Ok(None);
    }

    let mut merged = Map::new();
    for layer in config_layers(root, global_path) {
        if layer.is_file() {
            tracing::debug!(path = %layer.display(), "merging config layer");
            overlay_table(&mut merged, read_layer(&layer)?);
        }
    }

    let cfg: RenotaxConfig = Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| RenotaxError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(Some(cfg))
}

fn read_layer(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)?;
    content
        .parse::<toml::Table>()
        .map_err(|e| RenotaxError::ConfigParse(format!("{}: {e}", path.display())))
}

/// Deep-merges `layer` into `base`: nested tables merge key by key, anything else replaces.
fn overlay_table(base: &mut Map<String, Value>, layer: Map<String, Value>) {
    for (key, incoming) in layer {
        let nested = match incoming {
            Value::Table(nested) => nested,
            scalar => {
                base.insert(key, scalar);
                continue;
            }
        };
        if let Some(Value::Table(existing)) = base.get_mut(&key) {
            overlay_table(existing, nested);
        } else {
            base.insert(key, Value::Table(nested));
        }
    }
}
