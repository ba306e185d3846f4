use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use stackfall_engine::GameConfig;

/// Writes `value` as pretty JSON followed by a newline, to `output_path` or
/// to stdout without one.
pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let target = output_path.map_or_else(|| "stdout".to_owned(), |p| p.display().to_string());
    let mut writer: Box<dyn Write> = match output_path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {target}"))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    write_json(&mut writer, value).with_context(|| format!("Failed to write JSON to {target}"))
}

fn write_json<W, T>(writer: &mut W, value: &T) -> anyhow::Result<()>
where
    W: Write + ?Sized,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Loads a game config from a JSON file, or the defaults without one.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = GameConfig::from_json_str(&json)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}
