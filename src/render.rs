// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration document renderer.
//!
//! Turns the accumulator's state into the YAML configuration consumed by
//! the home-automation integration. The document is written line by line
//! rather than through a serializer because parts of it are not structured
//! data: provenance comments ride along as plain `#` lines so they survive
//! hand-editing, and any value the discovery could not fully resolve gets
//! a "needs completion" suffix to catch the operator's eye.
//!
//! Output is deterministic: role sections appear in first-use order and
//! records in append order, so identical accumulator state renders to a
//! byte-identical document.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use crate::discovery::{DeviceRecord, DiscoveryAccumulator};

/// Suffix appended to values containing wildcard segments.
const NEEDS_COMPLETION: &str = " # <= NEED TO BE COMPLETED!!!";

/// Renders the accumulator state into a configuration document.
///
/// # Examples
///
/// ```
/// use eltakor_lib::discovery::{DiscoveryAccumulator, HardwareUnit};
/// use eltakor_lib::render::render;
/// use eltakor_lib::types::Address;
///
/// let mut acc = DiscoveryAccumulator::new(Address::new(0x200));
/// acc.add_device(&HardwareUnit::new("FUD14", Address::new(0x05)));
///
/// let doc = render(&acc);
/// assert!(doc.starts_with("eltako:\n"));
/// assert!(doc.contains("  - id: 00-00-00-05\n"));
/// ```
#[must_use]
pub fn render(acc: &DiscoveryAccumulator) -> String {
    let mut doc = String::new();
    doc.push_str("eltako:\n");

    for (role, records) in acc.records() {
        let _ = writeln!(doc, "  {}:", role.as_str());
        for record in records {
            render_record(&mut doc, record);
        }
    }

    // Verbose logging for the integration is always enabled in generated
    // configurations so first-time setups are debuggable.
    doc.push_str("logger:\n");
    doc.push_str("  default: info\n");
    doc.push_str("  logs:\n");
    doc.push_str("    eltako: debug\n");

    doc
}

fn render_record(doc: &mut String, record: &DeviceRecord) {
    let _ = writeln!(doc, "  - id: {}", record.id);
    let _ = writeln!(doc, "    eep: {}", annotate(&record.eep));
    let _ = writeln!(doc, "    name: {}", annotate(&record.name));

    if let Some(sender) = &record.sender {
        doc.push_str("    sender:\n");
        let _ = writeln!(doc, "      id: {}", sender.id);
        let _ = writeln!(doc, "      eep: {}", annotate(&sender.eep));
    }

    if let Some(device_class) = &record.device_class {
        let _ = writeln!(doc, "    device_class: {}", annotate(device_class));
    }
    if let Some(time_closes) = record.time_closes {
        let _ = writeln!(doc, "    time_closes: {time_closes}");
    }
    if let Some(time_opens) = record.time_opens {
        let _ = writeln!(doc, "    time_opens: {time_opens}");
    }

    if let Some(comment) = &record.comment {
        let _ = writeln!(doc, "    # {comment}");
    }
}

/// Flags values the discovery could not fully resolve.
fn annotate(value: &str) -> String {
    if value.contains('?') {
        format!("{value}{NEEDS_COMPLETION}")
    } else {
        value.to_string()
    }
}

/// Renders the accumulator state and writes it to `path`.
///
/// The file is written in one shot without a temp-file-and-rename step; a
/// discovery run is cheap to repeat, so an interrupted write is recovered
/// by re-running the tool.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_config(acc: &DiscoveryAccumulator, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    tracing::info!(
        path = %path.display(),
        records = acc.record_count(),
        "Storing configuration"
    );
    fs::write(path, render(acc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::HardwareUnit;
    use crate::telegram::{Message, Org, Telegram};
    use crate::types::Address;

    fn populated_accumulator() -> DiscoveryAccumulator {
        let mut acc = DiscoveryAccumulator::new(Address::new(0x200));
        acc.add_device(&HardwareUnit::new("FSR14_x2", Address::new(0x100)));
        acc.add_device(&HardwareUnit::new("FSB14", Address::new(0x0A)));
        acc.add_sensor(&Message::Telegram(Telegram {
            org: Org::FourBs,
            address: Address::new(0x0055_AA00),
            data: [0; 4],
            status: 0,
            outgoing: true,
        }));
        acc
    }

    #[test]
    fn renders_actuator_with_sender_block() {
        let doc = render(&populated_accumulator());
        let expected = "eltako:\n\
                        \x20 light:\n\
                        \x20 - id: 00-00-01-00\n\
                        \x20   eep: M5-38-08\n\
                        \x20   name: FSR14_x2 - 256\n\
                        \x20   sender:\n\
                        \x20     id: 00-00-03-00\n\
                        \x20     eep: A5-38-08\n\
                        \x20 - id: 00-00-01-01\n";
        assert!(doc.starts_with(expected), "got:\n{doc}");
    }

    #[test]
    fn renders_cover_fields_after_sender() {
        let doc = render(&populated_accumulator());
        let expected = "\x20 cover:\n\
                        \x20 - id: 00-00-00-0A\n\
                        \x20   eep: G5-3F-7F\n\
                        \x20   name: FSB14 - 10\n\
                        \x20   sender:\n\
                        \x20     id: 00-00-02-0A\n\
                        \x20     eep: H5-3F-7F\n\
                        \x20   device_class: shutter\n\
                        \x20   time_closes: 24\n\
                        \x20   time_opens: 25\n";
        assert!(doc.contains(expected), "got:\n{doc}");
    }

    #[test]
    fn renders_wildcards_with_completion_suffix() {
        let doc = render(&populated_accumulator());
        assert!(doc.contains("    eep: A5-??-?? # <= NEED TO BE COMPLETED!!!\n"));
    }

    #[test]
    fn renders_comment_as_trailing_line() {
        let doc = render(&populated_accumulator());
        assert!(doc.contains(
            "    # Sensor Type: Multi-Sensor ?, Derived from Msg Type: 4BS\n"
        ));
        // The comment is not a structured field.
        assert!(!doc.contains("comment:"));
    }

    #[test]
    fn logger_trailer_always_present() {
        let empty = DiscoveryAccumulator::new(Address::new(0x200));
        let doc = render(&empty);
        assert_eq!(
            doc,
            "eltako:\nlogger:\n  default: info\n  logs:\n    eltako: debug\n"
        );
    }

    #[test]
    fn render_is_deterministic() {
        let acc = populated_accumulator();
        assert_eq!(render(&acc), render(&acc));
    }

    #[test]
    fn write_config_round_trip() {
        let acc = populated_accumulator();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discovered_eltako.yml");

        write_config(&acc, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render(&acc));
    }
}
