mod combine_timing_test;
mod switch_timing_test;
