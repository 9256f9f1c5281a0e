use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Long form used in headers, e.g. "Monday, Jan 8".
pub fn describe_day(d: &NaiveDate) -> String {
    d.format("%A, %b %-d").to_string()
}
