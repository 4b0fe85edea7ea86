// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heuristic sensor-type classification.
//!
//! Telegrams that did not come from an enumerated bus device carry no
//! hardware-type information, so the discovery tool guesses a sensor
//! subtype from the address range and payload shape. The guess is advisory
//! only: it ends up in a comment in the generated configuration and is
//! never used for automated decisions.

use crate::telegram::{checksum, Message, Org, Telegram};

/// FTS14EM input modules occupy this reserved address range.
const FTS14EM_MIN: u32 = 0x0000_1001;
const FTS14EM_MAX: u32 = 0x0000_1489;

/// Radio rocker switches teach in with addresses above this threshold.
const ROCKER_THRESHOLD: u32 = 0xFEDB_0000;

/// Outcome of a classification attempt.
///
/// # Examples
///
/// ```
/// use eltakor_lib::classify::{classify, Classification};
/// use eltakor_lib::telegram::{Org, Telegram};
/// use eltakor_lib::types::Address;
///
/// let telegram = Telegram {
///     org: Org::Rps,
///     address: Address::new(0xFEDB_0A01),
///     data: [0x70, 0, 0, 0],
///     status: 0x30,
///     outgoing: true,
/// };
/// assert_eq!(
///     classify(&telegram),
///     Classification::Identified("Wall Switch / Rocker Switch")
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The telegram matched a known hardware family.
    Identified(&'static str),
    /// A placeholder guess the operator should verify.
    LowConfidence(&'static str),
    /// No rule matched.
    Unrecognized,
}

impl Classification {
    /// Returns the label written into the configuration comment.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Identified(label) | Self::LowConfidence(label) => label,
            Self::Unrecognized => "???",
        }
    }
}

/// Guesses a sensor subtype for a telegram.
///
/// Rules are evaluated in precedence order; the first match wins:
///
/// 1. 1BS telegrams whose re-encoded frame parses cleanly and whose address
///    lies in the reserved FTS14EM range are FTS14EM input modules.
/// 2. RPS telegrams above the radio teach-in threshold are wall/rocker
///    switches.
/// 3. 4BS telegrams get a low-confidence multi-sensor placeholder.
/// 4. Everything else is unrecognized.
#[must_use]
pub fn classify(telegram: &Telegram) -> Classification {
    if telegram.org == Org::OneBs {
        // Revalidate the frame with a freshly computed checksum before
        // trusting the address. A malformed frame falls through instead of
        // aborting classification.
        let mut frame = telegram.encode();
        frame[13] = checksum(&frame[2..13]);
        match Message::parse(&frame) {
            Ok(Message::Telegram(t))
                if (FTS14EM_MIN..=FTS14EM_MAX).contains(&t.address.raw()) =>
            {
                return Classification::Identified("FTS14EM switch");
            }
            Ok(_) | Err(_) => {}
        }
    }

    if telegram.org == Org::Rps && telegram.address.raw() > ROCKER_THRESHOLD {
        return Classification::Identified("Wall Switch / Rocker Switch");
    }

    if telegram.org == Org::FourBs {
        return Classification::LowConfidence("Multi-Sensor ?");
    }

    Classification::Unrecognized
}
