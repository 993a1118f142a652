//! UPS status report and the `KEY : VALUE` line decoder.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::trace;

use crate::duration::parse_nis_duration;
use crate::error::{DecodeError, DecodeResult};
use crate::key::Key;
use crate::time::{parse_optional_time, TIME_FORMAT_LONG};

/// Status of an APC UPS, as returned by a NIS.
///
/// Every field starts at its zero value; a key the daemon did not send leaves
/// its field untouched. Timestamps are `None` when absent or reported as `N/A`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// Header record: format revision, record count and byte count, verbatim.
    pub apc: String,
    /// When the information was last obtained from the UPS.
    pub date: Option<DateTime<FixedOffset>>,
    /// Machine that collected the UPS data.
    pub hostname: String,
    /// apcupsd release, build date and platform.
    pub version: String,
    pub ups_name: String,
    pub cable: String,
    pub driver: String,
    pub ups_mode: String,
    /// When apcupsd was started.
    pub start_time: Option<DateTime<FixedOffset>>,
    pub model: String,
    /// Status word (ONLINE, ONBATT, ...).
    pub status: String,
    pub line_voltage: f64,
    pub load_percent: f64,
    pub battery_charge_percent: f64,
    /// Remaining runtime on batteries as estimated by the UPS.
    pub time_left: Duration,
    pub minimum_battery_charge_percent: f64,
    pub minimum_time_left: Duration,
    /// Shutdown after this long on batteries. Zero disables the feature.
    pub maximum_time: Duration,
    pub sense: String,
    pub low_transfer_voltage: f64,
    pub high_transfer_voltage: f64,
    /// Alarm delay. Zero when the daemon reports free text such as `No alarm`.
    pub alarm_delay: Duration,
    pub battery_voltage: f64,
    /// Reason for the last transfer to batteries.
    pub last_transfer: String,
    /// Transfers to batteries since apcupsd startup.
    pub number_transfers: i64,
    /// Last transfer to batteries.
    pub x_on_battery: Option<DateTime<FixedOffset>>,
    pub time_on_battery: Duration,
    pub cumulative_time_on_battery: Duration,
    /// Last transfer from batteries.
    pub x_off_battery: Option<DateTime<FixedOffset>>,
    pub last_selftest: Option<DateTime<FixedOffset>>,
    pub selftest: bool,
    /// Status bitfield, as sent.
    pub status_flags: String,
    pub serial_number: String,
    /// Battery replacement date, as sent.
    pub battery_date: String,
    pub nominal_input_voltage: f64,
    pub nominal_battery_voltage: f64,
    /// Maximum power in watts the UPS is designed to supply.
    pub nominal_power: i64,
    pub firmware: String,
    /// When the STATUS record was written.
    pub end_apc: Option<DateTime<FixedOffset>>,
    pub internal_temp: f64,
    pub output_voltage: f64,
    pub line_frequency: f64,
}

/// Mutable view of the field a key writes to.
enum Slot<'a> {
    Text(&'a mut String),
    Float(&'a mut f64),
    Timestamp(&'a mut Option<DateTime<FixedOffset>>),
    Duration(&'a mut Duration),
    Count(&'a mut i64),
    Watts(&'a mut i64),
    Flag(&'a mut bool),
}

/// A copied field value, for display and inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Float(f64),
    Timestamp(Option<DateTime<FixedOffset>>),
    Duration(Duration),
    Count(i64),
    Watts(i64),
    Flag(bool),
}

impl FieldValue {
    /// Returns true if the value equals its type's zero value.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Float(f) => *f == 0.0,
            Self::Timestamp(t) => t.is_none(),
            Self::Duration(d) => d.is_zero(),
            Self::Count(n) | Self::Watts(n) => *n == 0,
            Self::Flag(b) => !*b,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Float(x) => write!(f, "{x:.1}"),
            Self::Timestamp(Some(t)) => write!(f, "{}", t.format(TIME_FORMAT_LONG)),
            Self::Timestamp(None) => f.write_str("N/A"),
            Self::Duration(d) => write!(f, "{} Seconds", d.as_secs_f64()),
            Self::Count(n) => write!(f, "{n}"),
            Self::Watts(n) => write!(f, "{n} Watts"),
            Self::Flag(true) => f.write_str("YES"),
            Self::Flag(false) => f.write_str("NO"),
        }
    }
}

impl StatusReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes every non-blank line into a fresh report.
    ///
    /// Stops at the first line that fails to decode.
    pub fn from_lines<'a, I>(lines: I) -> DecodeResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut report = Self::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            report.decode_line(line)?;
        }
        Ok(report)
    }

    /// Decodes one `KEY : VALUE` line into the field the key maps to.
    ///
    /// Unknown keys are ignored. On error the target field is left as it was,
    /// except for `ALARMDEL`, whose unparseable values decode to zero.
    pub fn decode_line(&mut self, line: &str) -> DecodeResult<()> {
        let (token, value) = line
            .split_once(':')
            .ok_or(DecodeError::InvalidKeyValuePair)?;
        let (token, value) = (token.trim(), value.trim());

        let Some(key) = Key::from_token(token) else {
            trace!(key = token, "Ignoring unrecognized status key");
            return Ok(());
        };

        match self.slot(key) {
            Slot::Text(field) => *field = value.to_string(),
            Slot::Float(field) => *field = first_word(value).parse()?,
            Slot::Timestamp(field) => *field = parse_optional_time(value)?,
            Slot::Duration(field) if key == Key::AlarmDel => {
                *field = parse_nis_duration(value).unwrap_or_default();
            }
            Slot::Duration(field) => *field = parse_nis_duration(value)?,
            Slot::Count(field) => *field = value.parse()?,
            Slot::Watts(field) => *field = first_word(value).parse()?,
            Slot::Flag(field) => *field = value == "YES",
        }

        Ok(())
    }

    /// Iterates over fields that hold a non-zero value, in wire order.
    pub fn populated(&self) -> impl Iterator<Item = (Key, FieldValue)> + '_ {
        Key::ALL
            .into_iter()
            .map(|key| (key, self.get(key)))
            .filter(|(_, value)| !value.is_zero())
    }
}

/// Binds each key to its field, generating the mutable slot lookup used by
/// the decoder and the copying getter used for display.
macro_rules! field_table {
    ($($key:ident => $kind:ident($field:ident)),* $(,)?) => {
        impl StatusReport {
            fn slot(&mut self, key: Key) -> Slot<'_> {
                match key {
                    $(Key::$key => Slot::$kind(&mut self.$field),)*
                }
            }

            /// Returns a copy of the field a key maps to.
            pub fn get(&self, key: Key) -> FieldValue {
                match key {
                    $(Key::$key => FieldValue::$kind(self.$field.clone()),)*
                }
            }
        }
    };
}

field_table! {
    Apc => Text(apc),
    Date => Timestamp(date),
    Hostname => Text(hostname),
    Version => Text(version),
    UpsName => Text(ups_name),
    Cable => Text(cable),
    Driver => Text(driver),
    UpsMode => Text(ups_mode),
    StartTime => Timestamp(start_time),
    Model => Text(model),
    Status => Text(status),
    LineV => Float(line_voltage),
    LoadPct => Float(load_percent),
    BCharge => Float(battery_charge_percent),
    TimeLeft => Duration(time_left),
    MBattChg => Float(minimum_battery_charge_percent),
    MinTimeL => Duration(minimum_time_left),
    MaxTime => Duration(maximum_time),
    OutputV => Float(output_voltage),
    Sense => Text(sense),
    LoTrans => Float(low_transfer_voltage),
    HiTrans => Float(high_transfer_voltage),
    AlarmDel => Duration(alarm_delay),
    BattV => Float(battery_voltage),
    LineFreq => Float(line_frequency),
    LastXfer => Text(last_transfer),
    ITemp => Float(internal_temp),
    NumXfers => Count(number_transfers),
    XOnBatt => Timestamp(x_on_battery),
    TOnBatt => Duration(time_on_battery),
    CumOnBatt => Duration(cumulative_time_on_battery),
    XOffBatt => Timestamp(x_off_battery),
    LastStest => Timestamp(last_selftest),
    Selftest => Flag(selftest),
    StatFlag => Text(status_flags),
    SerialNo => Text(serial_number),
    BattDate => Text(battery_date),
    NomInV => Float(nominal_input_voltage),
    NomBattV => Float(nominal_battery_voltage),
    NomPower => Watts(nominal_power),
    Firmware => Text(firmware),
    EndApc => Timestamp(end_apc),
}

/// The token before the first space; unit words after it are dropped.
fn first_word(value: &str) -> &str {
    value.split_once(' ').map_or(value, |(word, _)| word)
}
