mod flush_and_compression;
mod sink_faults;
