use std::io::{self, Write};

use log::{debug, error};
use time::Date;

use super::err::CustomError;
use super::shipment::{local_today, Attributes, NewShipment, Shipment};

/// Shipments in input order, with lookups by shipment and order number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipmentsHandler {
    shipments: Vec<Shipment>,
}

impl ShipmentsHandler {
    pub fn new(shipments: Vec<Shipment>) -> Self {
        Self { shipments }
    }

    /// Parse one shipment per line
    ///
    /// Each line holds `number, order_number, shipment_date, first_name,
    /// last_name, parent_number`, split on `,` and trimmed. Missing or empty
    /// trailing fields are absent. Trailing newlines at the end of the data are
    /// ignored but blank lines in between are not, so they fail like any
    /// other line without a first name. The first failing line aborts the
    /// whole parse.
    pub fn parse(shipment_data: &str) -> Result<Self, CustomError> {
        let mut shipments = Vec::new();
        for (index, line) in split_lines(shipment_data).enumerate() {
            let shipment = Shipment::new(shipment_fields(line)).map_err(|err| {
                error!("shipment line {}: {}", index + 1, err);
                err
            })?;
            shipments.push(shipment);
        }
        debug!("parsed {} shipments", shipments.len());

        Ok(Self::new(shipments))
    }

    pub fn shipments(&self) -> &[Shipment] {
        &self.shipments
    }

    pub fn len(&self) -> usize {
        self.shipments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shipments.is_empty()
    }

    /// Print every shipment to stdout, see [`ShipmentsHandler::write_all`]
    pub fn print_all(&self) -> Result<&Self, CustomError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_all(&mut out)?;
        out.flush()?;
        Ok(self)
    }

    /// Write `Shipment #n:` and the shipment line for each shipment,
    /// with one blank line between shipments and none after the last
    pub fn write_all<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (index, shipment) in self.shipments.iter().enumerate() {
            if index > 0 {
                out.write_all(b"\n\n")?;
            }
            write!(out, "Shipment #{}:\n{}", index + 1, shipment)?;
        }
        Ok(())
    }

    /// Stored attributes of the first shipment with this number
    pub fn find(&self, number: &str) -> Option<Attributes> {
        debug!("find shipment {}", number);
        self.fetch(number).map(Shipment::base_attributes)
    }

    /// Like [`ShipmentsHandler::find`], with `full_name` and `days_ago` added
    pub fn find_with_computed(&self, number: &str) -> Result<Option<Attributes>, CustomError> {
        self.find_with_computed_at(number, local_today())
    }

    pub fn find_with_computed_at(
        &self,
        number: &str,
        today: Date,
    ) -> Result<Option<Attributes>, CustomError> {
        debug!("find shipment {} with computed attributes", number);
        self.fetch(number)
            .map(|shipment| shipment.attributes_at(true, today))
            .transpose()
    }

    /// Attributes, computed ones included, of every shipment in the order
    ///
    /// Querying "N/A" returns the shipments without an order number.
    pub fn find_by_order(&self, order_number: &str) -> Result<Vec<Attributes>, CustomError> {
        self.find_by_order_at(order_number, local_today())
    }

    pub fn find_by_order_at(
        &self,
        order_number: &str,
        today: Date,
    ) -> Result<Vec<Attributes>, CustomError> {
        debug!("find shipments of order {}", order_number);
        self.shipments
            .iter()
            .filter(|shipment| shipment.order_number() == order_number)
            .map(|shipment| shipment.attributes_at(true, today))
            .collect()
    }

    fn fetch(&self, number: &str) -> Option<&Shipment> {
        self.shipments
            .iter()
            .find(|shipment| shipment.number() == number)
    }
}

fn split_lines(data: &str) -> impl Iterator<Item = &str> {
    let data = data.trim_end_matches('\n');
    // empty data has no lines at all
    (!data.is_empty())
        .then(|| data.split('\n'))
        .into_iter()
        .flatten()
}

fn shipment_fields(line: &str) -> NewShipment {
    let mut segments: Vec<&str> = line.split(',').collect();
    // empty trailing segments count as absent fields
    while segments.last().is_some_and(|segment| segment.is_empty()) {
        segments.pop();
    }
    let mut fields = segments.into_iter().map(|field| field.trim().to_string());
    NewShipment {
        number: fields.next(),
        order_number: fields.next(),
        shipment_date: fields.next(),
        first_name: fields.next(),
        last_name: fields.next(),
        parent_number: fields.next(),
    }
}
