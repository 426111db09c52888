//! Integration tests for the DietCue scheduling core.


mod countdown_test;
mod firing_test;
mod plan_test;
mod reconcile_test;
