//! Trading calendar adapters.

mod holiday_file;

pub use holiday_file::HolidayFileCalendar;
