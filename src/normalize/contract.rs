//! Outbound order contracts.
//!
//! A contract declares the fields an outbound payload may carry, their
//! nullability and domain constraints. It is used only to partition a
//! candidate's fields into mandatory and optional sets before serialization;
//! validation is opt-in because the same path serves both trusted internal
//! construction and user-supplied order data.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{CellValue, Record};
use crate::error::{ContractViolation, Result};

/// Domain constraint on a single contract field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldConstraint {
    /// Value must be one of the listed strings.
    OneOf(BTreeSet<String>),
    /// Numeric value strictly greater than the bound.
    GreaterThan(Decimal),
    /// Numeric value greater than or equal to the bound.
    AtLeast(Decimal),
}

impl FieldConstraint {
    fn check(&self, field: &str, value: &CellValue) -> std::result::Result<(), ContractViolation> {
        let violation = |reason: String| ContractViolation::InvalidValue {
            field: field.to_string(),
            reason,
        };
        match self {
            Self::OneOf(allowed) => match value.as_str() {
                Some(text) if allowed.contains(text) => Ok(()),
                _ => Err(violation(format!(
                    "must be one of {allowed:?}, got {value:?}"
                ))),
            },
            Self::GreaterThan(bound) => match value.as_decimal() {
                Some(number) if number > *bound => Ok(()),
                _ => Err(violation(format!("must be > {bound}, got {value:?}"))),
            },
            Self::AtLeast(bound) => match value.as_decimal() {
                Some(number) if number >= *bound => Ok(()),
                _ => Err(violation(format!("must be >= {bound}, got {value:?}"))),
            },
        }
    }
}

/// Conditional requirement: the field must be present whenever another field
/// holds one of the listed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredWhen {
    pub field: String,
    pub equals: BTreeSet<String>,
}

/// One declared field of an outbound contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractField {
    pub name: String,
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<FieldConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_when: Option<RequiredWhen>,
}

impl ContractField {
    fn required(name: &str, constraint: Option<FieldConstraint>) -> Self {
        Self {
            name: name.to_string(),
            nullable: false,
            constraint,
            required_when: None,
        }
    }

    fn nullable(name: &str, constraint: Option<FieldConstraint>) -> Self {
        Self {
            name: name.to_string(),
            nullable: true,
            constraint,
            required_when: None,
        }
    }
}

/// Declarative schema for outbound order payloads. Never mutated by use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutboundOrderContract {
    fields: Vec<ContractField>,
}

fn one_of(values: &[&str]) -> Option<FieldConstraint> {
    Some(FieldConstraint::OneOf(
        values.iter().map(|s| (*s).to_string()).collect(),
    ))
}

impl OutboundOrderContract {
    pub fn new(fields: Vec<ContractField>) -> Self {
        Self { fields }
    }

    /// The base contract for orders on any venue: side and type are
    /// enumerated, amount must be positive, and a limit order must carry a
    /// price even though price is otherwise optional.
    pub fn order_default() -> Self {
        let mut price = ContractField::nullable("price", Some(FieldConstraint::AtLeast(Decimal::ZERO)));
        price.required_when = Some(RequiredWhen {
            field: "type".to_string(),
            equals: ["limit".to_string()].into(),
        });
        Self::new(vec![
            ContractField::nullable("id", None),
            ContractField::required("symbol", None),
            ContractField::required("side", one_of(&["buy", "sell"])),
            ContractField::required(
                "type",
                one_of(&["limit", "market", "stop_loss", "take_profit"]),
            ),
            ContractField::required("amount", Some(FieldConstraint::GreaterThan(Decimal::ZERO))),
            price,
            ContractField::nullable("params", None),
        ])
    }

    pub fn fields(&self) -> &[ContractField] {
        &self.fields
    }

    pub fn mandatory_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| !f.nullable)
            .map(|f| f.name.as_str())
    }

    pub fn optional_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.nullable)
            .map(|f| f.name.as_str())
    }
}

/// The mandatory/optional split of a candidate's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPartition {
    /// Every required contract field, present or not.
    pub mandatory: Vec<String>,
    /// The nullable contract fields the candidate actually carries.
    pub optional: Vec<String>,
}

/// Partition a candidate payload's fields against a contract.
///
/// With `validate` set, a missing (or null) mandatory field, an unmet
/// conditional requirement, or a present field breaking its domain
/// constraint is a [`ContractViolation`]; without it the partition is
/// returned unchecked.
pub fn partition_fields(
    candidate: &Record,
    contract: &OutboundOrderContract,
    validate: bool,
) -> Result<FieldPartition> {
    if validate {
        check_contract(candidate, contract)?;
    }
    let mandatory = contract.mandatory_fields().map(str::to_string).collect();
    let optional = contract
        .optional_fields()
        .filter(|name| candidate.contains(name))
        .map(str::to_string)
        .collect();
    Ok(FieldPartition {
        mandatory,
        optional,
    })
}

fn check_contract(
    candidate: &Record,
    contract: &OutboundOrderContract,
) -> std::result::Result<(), ContractViolation> {
    for field in contract.fields() {
        let present = candidate.get(&field.name).filter(|cell| !cell.is_null());

        let conditionally_required = field.required_when.as_ref().is_some_and(|rule| {
            candidate
                .get(&rule.field)
                .and_then(CellValue::as_str)
                .is_some_and(|value| rule.equals.contains(value))
        });
        if (!field.nullable || conditionally_required) && present.is_none() {
            return Err(ContractViolation::MissingField {
                field: field.name.clone(),
            });
        }

        if let (Some(cell), Some(constraint)) = (present, field.constraint.as_ref()) {
            constraint.check(&field.name, cell)?;
        }
    }
    Ok(())
}

/// Rewrite every timestamp cell as its epoch-millisecond count in text form,
/// the shape venues expect in outbound payloads.
pub fn timestamps_to_epoch_strings(record: &Record) -> Record {
    record
        .iter()
        .map(|(column, cell)| {
            let value = match cell {
                CellValue::Timestamp(t) => CellValue::Text(t.timestamp_millis().to_string()),
                other => other.clone(),
            };
            (column.to_string(), value)
        })
        .collect()
}
