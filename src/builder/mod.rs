//! External build commands.
//!
//! Pure constructors for the three commands a run can issue: the CMake
//! configure step, the parallel make, and the test executable.

pub mod cmake;
pub mod make;
pub mod test_binary;

pub use cmake::configure_command;
pub use make::build_command;
pub use test_binary::test_command;
