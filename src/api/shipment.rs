use std::fmt;

use log::warn;
use serde::{ser::SerializeMap, Serialize, Serializer};
use time::{
    format_description::well_known::{Rfc2822, Rfc3339},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime,
};

use super::err::CustomError;

/// Stored in place of an absent or empty order/parent number
pub const NOT_AVAILABLE: &str = "N/A";

/// Raw fields of one shipment, as read from a data line or supplied by a caller
#[derive(Debug, Default, Clone)]
pub struct NewShipment {
    pub number: Option<String>,
    pub order_number: Option<String>,
    pub shipment_date: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub parent_number: Option<String>,
}

/// One shipment, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shipment {
    // customer
    first_name: String,
    last_name: String,
    // shipment number, used as the lookup key
    number: String,
    // "N/A" when the shipment belongs to no order
    order_number: String,
    // "N/A" when there is no parent shipment
    parent_number: String,
    // e.g. "2018-12-10 15:08:58 -0000"
    shipment_date: String,
}

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Days(i64),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            AttributeValue::Days(_) => None,
        }
    }

    pub fn as_days(&self) -> Option<i64> {
        match self {
            AttributeValue::Days(days) => Some(*days),
            AttributeValue::Text(_) => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(text: &str) -> Self {
        AttributeValue::Text(text.to_string())
    }
}

/// Attributes of a shipment keyed by field name, in a fixed order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(&'static str, AttributeValue)>,
}

impl Attributes {
    fn push(&mut self, key: &'static str, value: AttributeValue) {
        self.entries.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Shipment {
    /// Build a shipment, failing on the first absent required field
    ///
    /// An absent or empty `order_number`/`parent_number` becomes [`NOT_AVAILABLE`];
    /// every other value is kept verbatim.
    pub fn new(fields: NewShipment) -> Result<Self, CustomError> {
        let NewShipment {
            number,
            order_number,
            shipment_date,
            first_name,
            last_name,
            parent_number,
        } = fields;

        Ok(Self {
            first_name: first_name.ok_or(CustomError::MissingField("first_name"))?,
            last_name: last_name.ok_or(CustomError::MissingField("last_name"))?,
            number: number.ok_or(CustomError::MissingField("number"))?,
            order_number: or_not_available(order_number),
            parent_number: or_not_available(parent_number),
            shipment_date: shipment_date.ok_or(CustomError::MissingField("shipment_date"))?,
        })
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn shipment_date(&self) -> &str {
        &self.shipment_date
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn parent_number(&self) -> &str {
        &self.parent_number
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Calendar date the shipment went out, in the timestamp's own offset
    pub fn shipped_on(&self) -> Result<Date, CustomError> {
        parse_shipment_date(&self.shipment_date)
    }

    /// Whole days between today's local date and the shipment date
    pub fn days_ago(&self) -> Result<i64, CustomError> {
        self.days_ago_at(local_today())
    }

    /// Whole days between `today` and the shipment date, negative for a future date
    pub fn days_ago_at(&self, today: Date) -> Result<i64, CustomError> {
        Ok((today - self.shipped_on()?).whole_days())
    }

    /// The six stored fields, plus `full_name` and `days_ago` when `include_computed` is set
    pub fn attributes(&self, include_computed: bool) -> Result<Attributes, CustomError> {
        if include_computed {
            self.attributes_at(true, local_today())
        } else {
            Ok(self.base_attributes())
        }
    }

    pub fn attributes_at(
        &self,
        include_computed: bool,
        today: Date,
    ) -> Result<Attributes, CustomError> {
        let mut attributes = self.base_attributes();
        if include_computed {
            attributes.push("full_name", AttributeValue::Text(self.full_name()));
            attributes.push("days_ago", AttributeValue::Days(self.days_ago_at(today)?));
        }
        Ok(attributes)
    }

    pub(crate) fn base_attributes(&self) -> Attributes {
        let mut attributes = Attributes::default();
        attributes.push("number", self.number.as_str().into());
        attributes.push("order_number", self.order_number.as_str().into());
        attributes.push("shipment_date", self.shipment_date.as_str().into());
        attributes.push("first_name", self.first_name.as_str().into());
        attributes.push("last_name", self.last_name.as_str().into());
        attributes.push("parent_number", self.parent_number.as_str().into());
        attributes
    }

    pub fn to_display_string(&self) -> String {
        format!(
            "Number: {}, Order Number: {}, Shipped: {}, First Name: {}, Last Name: {}, Parent Shipment: {}",
            self.number,
            self.order_number,
            self.shipment_date,
            self.first_name,
            self.last_name,
            self.parent_number
        )
    }
}

impl fmt::Display for Shipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

fn or_not_available(value: Option<String>) -> String {
    value
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Today's date in the local offset, or in UTC if the offset is unknown
pub(crate) fn local_today() -> Date {
    match OffsetDateTime::now_local() {
        Ok(now) => now.date(),
        Err(err) => {
            warn!("local offset unavailable ({}), using the UTC date", err);
            OffsetDateTime::now_utc().date()
        }
    }
}

/// Parse the date part of a shipment timestamp
///
/// The data-file form `2018-12-10 15:08:58 -0000` is tried first, then
/// RFC 3339, RFC 2822, a timestamp without offset and a bare date.
/// On failure the error of the data-file form is reported.
fn parse_shipment_date(value: &str) -> Result<Date, CustomError> {
    let stamped = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute]"
    );
    let naive = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let date_only = format_description!("[year]-[month]-[day]");

    let first_error = match OffsetDateTime::parse(value, stamped) {
        Ok(at) => return Ok(at.date()),
        Err(err) => err,
    };

    OffsetDateTime::parse(value, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(value, &Rfc2822))
        .map(OffsetDateTime::date)
        .or_else(|_| PrimitiveDateTime::parse(value, naive).map(PrimitiveDateTime::date))
        .or_else(|_| Date::parse(value, date_only))
        .map_err(|_| CustomError::DateParseError {
            value: value.to_string(),
            source: first_error,
        })
}
