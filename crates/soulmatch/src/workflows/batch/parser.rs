use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::compatibility::{BirthRecord, Gender};
use crate::workflows::analysis::Partner;

/// Raw CSV row. Numeric columns stay textual so a bad cell rejects the row instead of the file.
#[derive(Debug, Deserialize)]
pub(crate) struct CoupleRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    person1_name: Option<String>,
    person1_year: String,
    person1_month: String,
    person1_day: String,
    person1_hour: String,
    person1_gender: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    person2_name: Option<String>,
    person2_year: String,
    person2_month: String,
    person2_day: String,
    person2_hour: String,
    person2_gender: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("column {column} has unreadable value `{value}`")]
pub struct FieldError {
    pub column: &'static str,
    pub value: String,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<CoupleRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<CoupleRow>() {
        rows.push(record?);
    }

    Ok(rows)
}

impl CoupleRow {
    pub(crate) fn names(&self) -> (Option<String>, Option<String>) {
        (self.person1_name.clone(), self.person2_name.clone())
    }

    pub(crate) fn partners(&self) -> Result<(Partner, Partner), FieldError> {
        let person1 = Partner {
            name: self.person1_name.clone(),
            birth: BirthRecord {
                year: number("person1_year", &self.person1_year)?,
                month: number("person1_month", &self.person1_month)?,
                day: number("person1_day", &self.person1_day)?,
                hour: number("person1_hour", &self.person1_hour)?,
                gender: gender("person1_gender", &self.person1_gender)?,
            },
        };
        let person2 = Partner {
            name: self.person2_name.clone(),
            birth: BirthRecord {
                year: number("person2_year", &self.person2_year)?,
                month: number("person2_month", &self.person2_month)?,
                day: number("person2_day", &self.person2_day)?,
                hour: number("person2_hour", &self.person2_hour)?,
                gender: gender("person2_gender", &self.person2_gender)?,
            },
        };
        Ok((person1, person2))
    }
}

fn number(column: &'static str, value: &str) -> Result<i32, FieldError> {
    value.trim().parse().map_err(|_| FieldError {
        column,
        value: value.to_string(),
    })
}

fn gender(column: &'static str, value: &str) -> Result<Gender, FieldError> {
    value.parse().map_err(|_| FieldError {
        column,
        value: value.to_string(),
    })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
