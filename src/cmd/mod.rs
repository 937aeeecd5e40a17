pub mod combine;
pub mod energy;
pub mod simulate;
pub mod speed;
