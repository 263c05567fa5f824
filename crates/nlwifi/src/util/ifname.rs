//! Interface name validation and sysfs lookups.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Maximum interface name length (including null terminator).
pub const IFNAMSIZ: usize = 16;

const SYS_CLASS_NET: &str = "/sys/class/net";

/// Validate an interface name.
pub fn validate(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidArgument("empty interface name".to_string()));
    }

    if name.len() >= IFNAMSIZ {
        return Err(Error::InvalidArgument(format!(
            "interface name {name:?} too long (max {} chars)",
            IFNAMSIZ - 1
        )));
    }

    if name == "." || name == ".." || name.contains('/') || name.contains('\0') {
        return Err(Error::InvalidArgument(format!(
            "interface name {name:?} contains invalid characters"
        )));
    }

    if name.chars().any(|c| c.is_whitespace()) {
        return Err(Error::InvalidArgument(format!(
            "interface name {name:?} contains whitespace"
        )));
    }

    Ok(())
}

fn sysfs_dir(name: &str) -> PathBuf {
    Path::new(SYS_CLASS_NET).join(name)
}

/// Check that `name` is a valid name of an existing network device.
pub fn exists(name: &str) -> Result<bool> {
    validate(name)?;
    Ok(sysfs_dir(name).exists())
}

/// Fail with [`Error::InterfaceNotFound`] unless the device exists.
pub fn require(name: &str) -> Result<()> {
    if exists(name)? {
        Ok(())
    } else {
        Err(Error::InterfaceNotFound {
            name: name.to_string(),
        })
    }
}

/// Convert an interface index to name.
pub fn index_to_name(index: u32) -> Result<String> {
    let not_found = || Error::InterfaceNotFound {
        name: format!("ifindex:{index}"),
    };
    if index == 0 {
        return Err(not_found());
    }

    for name in list_interfaces()? {
        if let Ok(content) = std::fs::read_to_string(sysfs_dir(&name).join("ifindex"))
            && content.trim().parse::<u32>() == Ok(index)
        {
            return Ok(name);
        }
    }

    Err(not_found())
}

/// Convert an interface name to index.
pub fn name_to_index(name: &str) -> Result<u32> {
    validate(name)?;

    let not_found = || Error::InterfaceNotFound {
        name: name.to_string(),
    };
    let content = std::fs::read_to_string(sysfs_dir(name).join("ifindex")).map_err(|_| not_found())?;
    content.trim().parse().map_err(|_| not_found())
}

/// Get all interface names, sorted.
pub fn list_interfaces() -> Result<Vec<String>> {
    let entries = std::fs::read_dir(SYS_CLASS_NET)?;

    let mut names: Vec<String> = entries
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();

    names.sort();
    Ok(names)
}

/// Check whether the device is driven by cfg80211.
pub fn is_wireless(name: &str) -> Result<bool> {
    validate(name)?;
    let dir = sysfs_dir(name);
    Ok(dir.join("phy80211").exists() || dir.join("wireless").exists())
}

/// Names of all wireless devices, sorted.
pub fn list_wireless() -> Result<Vec<String>> {
    let mut names = Vec::new();
    for name in list_interfaces()? {
        if is_wireless(&name).unwrap_or(false) {
            names.push(name);
        }
    }
    Ok(names)
}

/// Kernel driver bound to the device, if any.
pub fn driver(name: &str) -> Result<Option<String>> {
    require(name)?;
    match std::fs::read_link(sysfs_dir(name).join("device/driver")) {
        Ok(target) => Ok(target
            .file_name()
            .map(|driver| driver.to_string_lossy().to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::from_io(e, format!("read driver of {name}"))),
    }
}
