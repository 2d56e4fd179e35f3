use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::info;
use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::machine::Machine;

pub const DEFAULT_RANGE: (u64, u64) = (0, 256);

/// Largest range a dump may cover, matching the 1 KiB data memory of the
/// original tool chain.
pub const MAX_DUMP_CELLS: u64 = 1024;

#[derive(Debug, Serialize)]
pub struct MemoryDump {
    pub memory_dump: DumpBody,
}

#[derive(Debug, Serialize)]
pub struct DumpBody {
    pub start: u64,
    pub end: u64,
    pub size: u64,
    /// serde_json writes the integer keys as strings, in ascending address
    /// order.
    pub data: BTreeMap<u64, u8>,
}

impl MemoryDump {
    /// Snapshot of `[start, end)`. Unwritten cells are reported as 0.
    pub fn capture(machine: &Machine, start: u64, end: u64) -> Result<Self> {
        if start > end || end - start > MAX_DUMP_CELLS {
            return Err(Error::InvalidRange { start, end });
        }

        let data = (start..end)
            .map(|addr| (addr, machine.read(&BigUint::from(addr))))
            .collect();

        Ok(MemoryDump {
            memory_dump: DumpBody {
                start,
                end,
                size: end - start,
                data,
            },
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        info!(
            "memory dump saved to {} (addresses {}..{})",
            path.display(),
            self.memory_dump.start,
            self.memory_dump.end
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::run_script;
    use serde_json::Value;

    #[test]
    fn test_capture_range() {
        let machine = run_script("load 246\nwrite 10\nload 300\nwrite 12").unwrap();
        let dump = MemoryDump::capture(&machine, 9, 13).unwrap();
        assert_eq!(dump.memory_dump.size, 4);
        assert_eq!(dump.memory_dump.data.len(), 4);
        assert_eq!(dump.memory_dump.data[&10], 246);
        assert_eq!(dump.memory_dump.data[&11], 0);
        assert_eq!(dump.memory_dump.data[&12], 44);
    }

    #[test]
    fn test_json_shape() {
        let machine = run_script("load 1\nwrite 0").unwrap();
        let json: Value = serde_json::from_str(&MemoryDump::capture(&machine, 0, 2).unwrap().to_json().unwrap()).unwrap();
        assert_eq!(json["memory_dump"]["start"], 0);
        assert_eq!(json["memory_dump"]["end"], 2);
        assert_eq!(json["memory_dump"]["size"], 2);
        assert_eq!(json["memory_dump"]["data"]["0"], 1);
        assert_eq!(json["memory_dump"]["data"]["1"], 0);
    }

    #[test]
    fn test_json_keys_in_address_order() {
        let json = MemoryDump::capture(&Machine::new(), 8, 12).unwrap().to_json().unwrap();
        let pos = |addr: &str| json.find(&format!("\"{}\":", addr)).unwrap();
        assert!(pos("8") < pos("9"));
        assert!(pos("9") < pos("10"), "address 10 written before address 9");
        assert!(pos("10") < pos("11"));
    }

    #[test]
    fn test_oversized_range_rejected() {
        let machine = Machine::new();
        assert_eq!(MemoryDump::capture(&machine, 0, MAX_DUMP_CELLS).unwrap().memory_dump.data.len(), 1024);
        assert_eq!(MemoryDump::capture(&machine, 0x1000, 0x1000 + MAX_DUMP_CELLS).unwrap().memory_dump.size, 1024);
        assert!(matches!(
            MemoryDump::capture(&machine, 0, MAX_DUMP_CELLS + 1),
            Err(Error::InvalidRange { start: 0, end: 1025 })
        ));
        assert!(matches!(
            MemoryDump::capture(&machine, 0, u64::MAX),
            Err(Error::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_empty_and_invalid_ranges() {
        let machine = Machine::new();
        assert_eq!(MemoryDump::capture(&machine, 5, 5).unwrap().memory_dump.size, 0);
        assert!(matches!(
            MemoryDump::capture(&machine, 6, 5),
            Err(Error::InvalidRange { start: 6, end: 5 })
        ));
    }
}
