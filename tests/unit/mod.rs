


// Unit tests for presentation and setup
mod auth_test;
