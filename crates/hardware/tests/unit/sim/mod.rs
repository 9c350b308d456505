//! Simulation utility tests.
