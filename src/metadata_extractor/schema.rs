//! Extracted job metadata and its schema checks
//!
//! Enum values are matched leniently: case-insensitive, with spaces and
//! hyphens folded to underscores, so `"Full-time"` is `FULL_TIME`.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declares a closed metadata enum with its wire names and lenient parsing.
macro_rules! metadata_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Lenient lookup of a wire name.
            #[must_use]
            pub fn parse(raw: &str) -> Option<Self> {
                let folded = fold_enum_value(raw);
                Self::ALL.iter().copied().find(|v| v.as_str() == folded)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(raw: String) -> Result<Self, Self::Error> {
                Self::parse(&raw).ok_or_else(|| {
                    format!("'{raw}' is not one of {}", allowed_values(Self::ALL))
                })
            }
        }
    };
}

metadata_enum! {
    /// Broad geographic region of the role.
    Region {
        NorthAmerica => "NORTH_AMERICA",
        LatinAmerica => "LATIN_AMERICA",
        Europe => "EUROPE",
        MiddleEast => "MIDDLE_EAST",
        Africa => "AFRICA",
        AsiaPacific => "ASIA_PACIFIC",
        Remote => "REMOTE",
    }
}

metadata_enum! {
    JobFunction {
        Engineering => "ENGINEERING",
        Data => "DATA",
        Product => "PRODUCT",
        Design => "DESIGN",
        Marketing => "MARKETING",
        Sales => "SALES",
        Operations => "OPERATIONS",
        Finance => "FINANCE",
        HumanResources => "HUMAN_RESOURCES",
        CustomerSupport => "CUSTOMER_SUPPORT",
        Legal => "LEGAL",
        Research => "RESEARCH",
        Other => "OTHER",
    }
}

metadata_enum! {
    JobType {
        FullTime => "FULL_TIME",
        PartTime => "PART_TIME",
        Contract => "CONTRACT",
        Internship => "INTERNSHIP",
        Temporary => "TEMPORARY",
        Freelance => "FREELANCE",
    }
}

fn fold_enum_value(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

fn allowed_values<T: std::fmt::Display>(all: &[T]) -> String {
    all.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Structured metadata for one job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedMetadata {
    pub job_title: String,
    pub company_name: String,
    pub location: Region,
    pub job_function: JobFunction,
    pub job_type: JobType,
    pub date_posted: NaiveDate,
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date_posted(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Validate a parsed JSON value against the metadata schema.
///
/// Every violation is collected so one response reports all of its problems.
pub fn validate_metadata(value: &Value) -> Result<ExtractedMetadata, Vec<String>> {
    let Some(object) = value.as_object() else {
        return Err(vec![format!("expected a JSON object, got {}", json_kind(value))]);
    };

    let mut violations = Vec::new();

    let job_title = required_str(object, "jobTitle", &mut violations);
    let company_name = required_str(object, "companyName", &mut violations);
    let location = required_str(object, "location", &mut violations);
    let job_function = required_str(object, "jobFunction", &mut violations);
    let job_type = required_str(object, "jobType", &mut violations);
    let date_posted = required_str(object, "datePosted", &mut violations);

    let location = location.and_then(|raw| {
        Region::parse(raw).or_else(|| {
            violations.push(format!(
                "location '{raw}' is not one of {}",
                allowed_values(Region::ALL)
            ));
            None
        })
    });
    let job_function = job_function.and_then(|raw| {
        JobFunction::parse(raw).or_else(|| {
            violations.push(format!(
                "jobFunction '{raw}' is not one of {}",
                allowed_values(JobFunction::ALL)
            ));
            None
        })
    });
    let job_type = job_type.and_then(|raw| {
        JobType::parse(raw).or_else(|| {
            violations.push(format!(
                "jobType '{raw}' is not one of {}",
                allowed_values(JobType::ALL)
            ));
            None
        })
    });
    let date_posted = date_posted.and_then(|raw| {
        parse_date_posted(raw).or_else(|| {
            violations.push(format!("datePosted '{raw}' is not a valid date"));
            None
        })
    });

    match (job_title, company_name, location, job_function, job_type, date_posted) {
        (
            Some(job_title),
            Some(company_name),
            Some(location),
            Some(job_function),
            Some(job_type),
            Some(date_posted),
        ) if violations.is_empty() => Ok(ExtractedMetadata {
            job_title: job_title.trim().to_string(),
            company_name: company_name.trim().to_string(),
            location,
            job_function,
            job_type,
            date_posted,
        }),
        _ => Err(violations),
    }
}

fn required_str<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    violations: &mut Vec<String>,
) -> Option<&'a str> {
    match object.get(key) {
        None | Some(Value::Null) => {
            violations.push(format!("missing field '{key}'"));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            violations.push(format!("field '{key}' is empty"));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            violations.push(format!("field '{key}' must be a string, got {}", json_kind(other)));
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
