use enrich_core::{
    data::{
        chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike},
        DataValue,
    },
    err::{anyhow, Result},
};
use mysql_async::Value;

/// Converts a parameter into the value sent to mysql
pub fn to_mysql(val: DataValue) -> Value {
    match val {
        DataValue::Null => Value::NULL,
        DataValue::Utf8String(s) => Value::Bytes(s.into_bytes()),
        DataValue::Binary(b) => Value::Bytes(b),
        DataValue::Boolean(b) => Value::Int(b as i64),
        DataValue::Int64(i) => Value::Int(i),
        DataValue::UInt64(u) => Value::UInt(u),
        DataValue::Float64(f) => Value::Double(f),
        DataValue::Date(d) => Value::Date(d.year() as u16, d.month() as u8, d.day() as u8, 0, 0, 0, 0),
        DataValue::Time(t) => Value::Time(
            false,
            0,
            t.hour() as u8,
            t.minute() as u8,
            t.second() as u8,
            t.nanosecond() / 1000,
        ),
        DataValue::DateTime(dt) => Value::Date(
            dt.year() as u16,
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
            dt.nanosecond() / 1000,
        ),
        DataValue::JSON(s) => Value::Bytes(s.into_bytes()),
    }
}

/// Converts a value read from a mysql result row
pub fn from_mysql(val: Value) -> Result<DataValue> {
    Ok(match val {
        Value::NULL => DataValue::Null,
        Value::Bytes(b) => match String::from_utf8(b) {
            Ok(s) => DataValue::Utf8String(s),
            Err(err) => DataValue::Binary(err.into_bytes()),
        },
        Value::Int(i) => DataValue::Int64(i),
        Value::UInt(u) => DataValue::UInt64(u),
        Value::Float(f) => DataValue::Float64(f as f64),
        Value::Double(f) => DataValue::Float64(f),
        // mysql's zero date
        Value::Date(0, 0, 0, 0, 0, 0, 0) => DataValue::Null,
        Value::Date(y, m, d, 0, 0, 0, 0) => DataValue::Date(
            NaiveDate::from_ymd_opt(y as _, m as _, d as _)
                .ok_or_else(|| anyhow!("Invalid date {:04}-{:02}-{:02}", y, m, d))?,
        ),
        Value::Date(y, m, d, h, i, s, us) => {
            let date = NaiveDate::from_ymd_opt(y as _, m as _, d as _)
                .ok_or_else(|| anyhow!("Invalid date {:04}-{:02}-{:02}", y, m, d))?;
            let time = NaiveTime::from_hms_micro_opt(h as _, i as _, s as _, us)
                .ok_or_else(|| anyhow!("Invalid time {:02}:{:02}:{:02}", h, i, s))?;

            DataValue::DateTime(NaiveDateTime::new(date, time))
        }
        Value::Time(false, 0, h, i, s, us) => DataValue::Time(
            NaiveTime::from_hms_micro_opt(h as _, i as _, s as _, us)
                .ok_or_else(|| anyhow!("Invalid time {:02}:{:02}:{:02}", h, i, s))?,
        ),
        // Durations outside of a single day are rendered the way mysql prints them
        Value::Time(neg, days, h, i, s, us) => {
            let hours = days * 24 + h as u32;
            let mut time = format!("{}{:02}:{:02}:{:02}", if neg { "-" } else { "" }, hours, i, s);
            if us > 0 {
                time.push_str(&format!(".{:06}", us));
            }

            DataValue::Utf8String(time)
        }
    })
}
