//! # CSV Booking Repository
//!
//! File-based booking storage. Each property's bookings live in
//! `{data_directory}/{property_id}/bookings.csv`.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! └── {property_id}/
//!     └── bookings.csv    ← This module manages these files
//! ```
//!
//! ## CSV Format
//!
//! ```csv
//! id,check_in,check_out
//! booking::p1::1718000000000,2024-06-10,2024-06-12
//! ```
//!
//! Writes go through a temp file followed by a rename. Rows that cannot be
//! parsed are skipped with a warning rather than failing the whole read.

use anyhow::{bail, Result};
use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord, Writer};
use shared::{format_iso_date, parse_iso_date, AvailabilityResponse};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use tracing::{debug, info, warn};

use super::connection::CsvConnection;
use crate::domain::models::{availability_from_bookings, Booking};
use crate::storage::traits::AvailabilitySource;

#[derive(Clone, Debug)]
pub struct CsvBookingRepository {
    connection: CsvConnection,
}

impl CsvBookingRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read all bookings of a property, ordered by check-in
    pub async fn list_bookings(&self, property_id: &str) -> Result<Vec<Booking>> {
        let file_path = self.connection.bookings_file_path(property_id)?;
        if !file_path.exists() {
            debug!("No bookings file for property {}", property_id);
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(BufReader::new(file));

        let mut bookings = Vec::new();
        for (line, result) in csv_reader.records().enumerate() {
            let booking = match result {
                Ok(record) => parse_booking(property_id, &record),
                Err(e) => {
                    warn!("Unreadable booking row {} in {}: {}", line + 1, file_path.display(), e);
                    continue;
                }
            };

            match booking {
                Some(booking) => bookings.push(booking),
                None => warn!(
                    "Skipping malformed booking row {} in {}",
                    line + 1,
                    file_path.display()
                ),
            }
        }

        bookings.sort_by_key(|booking| booking.check_in);
        Ok(bookings)
    }

    /// Store a new booking, rejecting empty ranges and overlaps with existing stays
    pub async fn store_booking(&self, booking: &Booking) -> Result<()> {
        if booking.check_out <= booking.check_in {
            bail!(
                "Check-out {} must be after check-in {}",
                booking.check_out, booking.check_in
            );
        }

        let mut bookings = self.list_bookings(&booking.property_id).await?;
        if bookings.iter().any(|existing| existing.id == booking.id) {
            bail!("Booking {} already exists", booking.id);
        }
        if let Some(existing) = bookings.iter().find(|existing| existing.overlaps(booking)) {
            bail!(
                "Booking {} overlaps existing booking {} ({} to {})",
                booking.id, existing.id, existing.check_in, existing.check_out
            );
        }

        bookings.push(booking.clone());
        bookings.sort_by_key(|b| b.check_in);
        self.write_bookings(&booking.property_id, &bookings).await?;

        info!(
            "Stored booking {} for property {} ({} to {})",
            booking.id, booking.property_id, booking.check_in, booking.check_out
        );
        Ok(())
    }

    /// Delete a booking; returns whether it existed
    pub async fn delete_booking(&self, property_id: &str, booking_id: &str) -> Result<bool> {
        let mut bookings = self.list_bookings(property_id).await?;
        let before = bookings.len();
        bookings.retain(|booking| booking.id != booking_id);

        if bookings.len() == before {
            return Ok(false);
        }
        self.write_bookings(property_id, &bookings).await?;
        info!("Deleted booking {} for property {}", booking_id, property_id);
        Ok(true)
    }

    async fn write_bookings(&self, property_id: &str, bookings: &[Booking]) -> Result<()> {
        self.connection.ensure_property_directory(property_id)?;
        let file_path = self.connection.bookings_file_path(property_id)?;
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;

            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            csv_writer.write_record(["id", "check_in", "check_out"])?;
            for booking in bookings {
                csv_writer.write_record([
                    booking.id.as_str(),
                    format_iso_date(booking.check_in).as_str(),
                    format_iso_date(booking.check_out).as_str(),
                ])?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;
        Ok(())
    }
}

/// A row is `id,check_in,check_out` with a non-empty id and check-in before check-out
fn parse_booking(property_id: &str, record: &StringRecord) -> Option<Booking> {
    if record.len() != 3 {
        return None;
    }
    let id = record.get(0).filter(|id| !id.is_empty())?;
    let check_in = record.get(1).and_then(parse_iso_date)?;
    let check_out = record.get(2).and_then(parse_iso_date)?;
    if check_in >= check_out {
        return None;
    }

    Some(Booking {
        id: id.to_string(),
        property_id: property_id.to_string(),
        check_in,
        check_out,
    })
}

#[async_trait]
impl AvailabilitySource for CsvBookingRepository {
    async fn load_availability(&self, property_id: &str) -> Result<AvailabilityResponse> {
        let bookings = self.list_bookings(property_id).await?;
        Ok(availability_from_bookings(property_id, &bookings))
    }
}
