mod evaluation_tests;
mod reduction_tests;
