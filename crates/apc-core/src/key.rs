//! Status line keys and their decode strategies.
//!
//! A NIS status line looks like `KEY : VALUE`. The key selects exactly one
//! field of [`StatusReport`](crate::StatusReport) and the strategy used to
//! coerce the value into that field's type.

use std::fmt;

/// How the value of a status line is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Stored verbatim.
    Text,
    /// Leading token parsed as `f64`, trailing unit words dropped.
    Float,
    /// Absolute timestamp, `N/A` allowed.
    Timestamp,
    /// `<number> <unit>` duration.
    Duration,
    /// Plain decimal integer.
    Count,
    /// Leading token parsed as an integer, trailing unit word dropped.
    Watts,
    /// `YES` is true, anything else false.
    Flag,
}

/// A key sent by a NIS, one per modelled status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    AlarmDel,
    Apc,
    BattDate,
    BattV,
    BCharge,
    Cable,
    CumOnBatt,
    Date,
    Driver,
    EndApc,
    Firmware,
    HiTrans,
    Hostname,
    ITemp,
    LastStest,
    LastXfer,
    LineFreq,
    LineV,
    LoadPct,
    LoTrans,
    MaxTime,
    MBattChg,
    MinTimeL,
    Model,
    NomBattV,
    NomInV,
    NomPower,
    NumXfers,
    OutputV,
    Selftest,
    Sense,
    SerialNo,
    StartTime,
    StatFlag,
    Status,
    TimeLeft,
    TOnBatt,
    UpsMode,
    UpsName,
    Version,
    XOffBatt,
    XOnBatt,
}

impl Key {
    /// Every modelled key, in the order apcupsd usually emits them.
    pub const ALL: [Key; 42] = [
        Key::Apc,
        Key::Date,
        Key::Hostname,
        Key::Version,
        Key::UpsName,
        Key::Cable,
        Key::Driver,
        Key::UpsMode,
        Key::StartTime,
        Key::Model,
        Key::Status,
        Key::LineV,
        Key::LoadPct,
        Key::BCharge,
        Key::TimeLeft,
        Key::MBattChg,
        Key::MinTimeL,
        Key::MaxTime,
        Key::OutputV,
        Key::Sense,
        Key::LoTrans,
        Key::HiTrans,
        Key::AlarmDel,
        Key::BattV,
        Key::LineFreq,
        Key::LastXfer,
        Key::ITemp,
        Key::NumXfers,
        Key::XOnBatt,
        Key::TOnBatt,
        Key::CumOnBatt,
        Key::XOffBatt,
        Key::LastStest,
        Key::Selftest,
        Key::StatFlag,
        Key::SerialNo,
        Key::BattDate,
        Key::NomInV,
        Key::NomBattV,
        Key::NomPower,
        Key::Firmware,
        Key::EndApc,
    ];

    /// Looks up a trimmed key token. Matching is case sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        let key = match token {
            "ALARMDEL" => Self::AlarmDel,
            "APC" => Self::Apc,
            "BATTDATE" => Self::BattDate,
            "BATTV" => Self::BattV,
            "BCHARGE" => Self::BCharge,
            "CABLE" => Self::Cable,
            "CUMONBATT" => Self::CumOnBatt,
            "DATE" => Self::Date,
            "DRIVER" => Self::Driver,
            "END APC" => Self::EndApc,
            "FIRMWARE" => Self::Firmware,
            "HITRANS" => Self::HiTrans,
            "HOSTNAME" => Self::Hostname,
            "ITEMP" => Self::ITemp,
            "LASTSTEST" => Self::LastStest,
            "LASTXFER" => Self::LastXfer,
            "LINEFREQ" => Self::LineFreq,
            "LINEV" => Self::LineV,
            "LOADPCT" => Self::LoadPct,
            "LOTRANS" => Self::LoTrans,
            "MAXTIME" => Self::MaxTime,
            "MBATTCHG" => Self::MBattChg,
            "MINTIMEL" => Self::MinTimeL,
            "MODEL" => Self::Model,
            "NOMBATTV" => Self::NomBattV,
            "NOMINV" => Self::NomInV,
            "NOMPOWER" => Self::NomPower,
            "NUMXFERS" => Self::NumXfers,
            "OUTPUTV" => Self::OutputV,
            "SELFTEST" => Self::Selftest,
            "SENSE" => Self::Sense,
            "SERIALNO" => Self::SerialNo,
            "STARTTIME" => Self::StartTime,
            "STATFLAG" => Self::StatFlag,
            "STATUS" => Self::Status,
            "TIMELEFT" => Self::TimeLeft,
            "TONBATT" => Self::TOnBatt,
            "UPSMODE" => Self::UpsMode,
            "UPSNAME" => Self::UpsName,
            "VERSION" => Self::Version,
            "XOFFBATT" => Self::XOffBatt,
            "XONBATT" => Self::XOnBatt,
            _ => return None,
        };
        Some(key)
    }

    /// The token as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlarmDel => "ALARMDEL",
            Self::Apc => "APC",
            Self::BattDate => "BATTDATE",
            Self::BattV => "BATTV",
            Self::BCharge => "BCHARGE",
            Self::Cable => "CABLE",
            Self::CumOnBatt => "CUMONBATT",
            Self::Date => "DATE",
            Self::Driver => "DRIVER",
            Self::EndApc => "END APC",
            Self::Firmware => "FIRMWARE",
            Self::HiTrans => "HITRANS",
            Self::Hostname => "HOSTNAME",
            Self::ITemp => "ITEMP",
            Self::LastStest => "LASTSTEST",
            Self::LastXfer => "LASTXFER",
            Self::LineFreq => "LINEFREQ",
            Self::LineV => "LINEV",
            Self::LoadPct => "LOADPCT",
            Self::LoTrans => "LOTRANS",
            Self::MaxTime => "MAXTIME",
            Self::MBattChg => "MBATTCHG",
            Self::MinTimeL => "MINTIMEL",
            Self::Model => "MODEL",
            Self::NomBattV => "NOMBATTV",
            Self::NomInV => "NOMINV",
            Self::NomPower => "NOMPOWER",
            Self::NumXfers => "NUMXFERS",
            Self::OutputV => "OUTPUTV",
            Self::Selftest => "SELFTEST",
            Self::Sense => "SENSE",
            Self::SerialNo => "SERIALNO",
            Self::StartTime => "STARTTIME",
            Self::StatFlag => "STATFLAG",
            Self::Status => "STATUS",
            Self::TimeLeft => "TIMELEFT",
            Self::TOnBatt => "TONBATT",
            Self::UpsMode => "UPSMODE",
            Self::UpsName => "UPSNAME",
            Self::Version => "VERSION",
            Self::XOffBatt => "XOFFBATT",
            Self::XOnBatt => "XONBATT",
        }
    }

    /// Returns the decode strategy for this key.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Apc
            | Self::Hostname
            | Self::Version
            | Self::UpsName
            | Self::Cable
            | Self::Driver
            | Self::UpsMode
            | Self::Model
            | Self::Status
            | Self::Sense
            | Self::LastXfer
            | Self::StatFlag
            | Self::SerialNo
            | Self::BattDate
            | Self::Firmware => FieldKind::Text,

            Self::LineV
            | Self::LoadPct
            | Self::BCharge
            | Self::MBattChg
            | Self::LoTrans
            | Self::HiTrans
            | Self::BattV
            | Self::NomInV
            | Self::NomBattV
            | Self::ITemp
            | Self::OutputV
            | Self::LineFreq => FieldKind::Float,

            Self::Date
            | Self::StartTime
            | Self::XOnBatt
            | Self::XOffBatt
            | Self::LastStest
            | Self::EndApc => FieldKind::Timestamp,

            Self::TimeLeft
            | Self::MinTimeL
            | Self::MaxTime
            | Self::AlarmDel
            | Self::TOnBatt
            | Self::CumOnBatt => FieldKind::Duration,

            Self::NumXfers => FieldKind::Count,
            Self::NomPower => FieldKind::Watts,
            Self::Selftest => FieldKind::Flag,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
