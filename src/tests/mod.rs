//! # Scenario Test Suite
//!
//! End-to-end checks of the rotation engine through the public watchface API,
//! driven against the in-process compositor. Unit tests live next to the code
//! they cover; these exercise whole ticks and slide lifecycles.

mod rotation_tests;
