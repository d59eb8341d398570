pub mod connection;
pub mod booking_repository;

pub use connection::CsvConnection;
pub use booking_repository::CsvBookingRepository;
