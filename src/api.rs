use std::{fs, path::Path};

use clap::Subcommand;
use log::info;

pub mod err;
pub mod shipment;
pub mod shipments_handler;

use err::CustomError;
use shipments_handler::ShipmentsHandler;

/// A query to run against the loaded shipments
#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the listing of all shipments
    Print,
    /// Stored attributes of one shipment, as json
    Find {
        /// Shipment number
        number: String,
    },
    /// Attributes of one shipment including full name and days ago, as json
    Details {
        /// Shipment number
        number: String,
    },
    /// Every shipment of an order, as json
    Order {
        /// Order number, "N/A" for shipments without one
        order_number: String,
    },
}

/// Read a shipment data file and parse it
pub fn load_shipments(path: &Path) -> Result<ShipmentsHandler, CustomError> {
    let data = fs::read_to_string(path)?;
    let handler = ShipmentsHandler::parse(&data)?;
    info!("loaded {} shipments from {}", handler.len(), path.display());
    Ok(handler)
}

pub fn run(handler: &ShipmentsHandler, command: &Command) -> Result<(), CustomError> {
    match command {
        Command::Print => {
            // the listing has no trailing newline of its own
            if !handler.print_all()?.is_empty() {
                println!();
            }
        }
        query => println!("{}", query_json(handler, query)?),
    }
    Ok(())
}

/// Pretty json for a query; a shipment that is not found renders as `null`
pub fn query_json(handler: &ShipmentsHandler, command: &Command) -> Result<String, CustomError> {
    let json = match command {
        Command::Print => {
            return Err(CustomError::UsageError(
                "print has no json output".to_string(),
            ))
        }
        Command::Find { number } => serde_json::to_string_pretty(&handler.find(number))?,
        Command::Details { number } => {
            serde_json::to_string_pretty(&handler.find_with_computed(number)?)?
        }
        Command::Order { order_number } => {
            serde_json::to_string_pretty(&handler.find_by_order(order_number)?)?
        }
    };
    Ok(json)
}
