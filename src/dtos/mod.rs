pub mod authdtos;
pub mod dispatchdtos;
