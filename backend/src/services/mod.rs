//! Business logic services for the Property Rental Management Platform

pub mod booking;
pub mod checkout;
pub mod inventory;
pub mod reporting;

pub use booking::BookingService;
pub use checkout::CheckoutService;
pub use inventory::InventoryService;
pub use reporting::ReportingService;
