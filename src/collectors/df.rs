use crate::error::SampleError;
use crate::models::sample::Sample;
use std::collections::BTreeMap;
use std::process::Command;

pub const DEFAULT_DF_COMMAND: &str = "df";

/// Anything that can report used bytes for a mount point.
pub trait ByteUsageQuerier {
    fn used_bytes(&self, mount: &str) -> Result<i64, SampleError>;
}

/// Runs `df -B1 <mount>` and reads the "Used" column.
#[derive(Debug, Clone)]
pub struct DfQuerier {
    program: String,
}

impl DfQuerier {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl ByteUsageQuerier for DfQuerier {
    fn used_bytes(&self, mount: &str) -> Result<i64, SampleError> {
        let out = Command::new(&self.program)
            .args(["-B1", mount])
            .output()
            .map_err(|source| SampleError::Spawn { command: self.program.clone(), source })?;

        if !out.status.success() {
            return Err(SampleError::ExitStatus {
                command: self.program.clone(),
                status:  out.status,
                stderr:  String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }

        parse_df_output(&String::from_utf8_lossy(&out.stdout))
    }
}

/// Extract used bytes from `df -B1` output.
///
/// ```text
/// Filesystem                          1B-blocks        Used   Available Use% Mounted on
/// filer.example.com:/vol/projects
///                                 1099511627776 53687091200 1045824536576   5% /mnt/projects
/// ```
///
/// Long device names wrap the data onto a second line, so everything after the
/// header is joined before splitting. Field 2 is "Used".
pub fn parse_df_output(text: &str) -> Result<i64, SampleError> {
    let data: Vec<&str> = text.lines().skip(1).collect();
    if data.is_empty() {
        return Err(SampleError::MissingData);
    }
    let joined = data.join(" ");
    let fields: Vec<&str> = joined.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(SampleError::TooFewFields(fields.len()));
    }
    let used = fields[2].parse::<i64>().map_err(|e| {
        SampleError::InvalidNumber { value: fields[2].to_string(), reason: e.to_string() }
    })?;
    if used < 0 {
        return Err(SampleError::InvalidNumber {
            value:  fields[2].to_string(),
            reason: "negative byte count".into(),
        });
    }
    Ok(used)
}

/// Query every mount and build a sample from the ones that answered.
/// Failed mounts are logged and left out.
pub fn take_sample<Q: ByteUsageQuerier + ?Sized>(querier: &Q, mounts: &[String], timestamp: i64) -> Sample {
    let mut used = BTreeMap::new();
    for mount in mounts {
        match querier.used_bytes(mount) {
            Ok(bytes) => {
                tracing::debug!(%mount, bytes, "sampled");
                used.insert(mount.clone(), bytes);
            }
            Err(e) => tracing::warn!("Error getting df for {}: {}", mount, e),
        }
    }
    Sample::new(timestamp, used)
}
