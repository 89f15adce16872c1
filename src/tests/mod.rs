pub mod support;

mod cache_tests;
