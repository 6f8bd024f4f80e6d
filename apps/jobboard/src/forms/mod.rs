// Form validation for submissions that reach the board store.

pub mod validation;
