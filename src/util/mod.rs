pub mod quartz_log;
