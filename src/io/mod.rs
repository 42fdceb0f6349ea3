pub(crate) mod counting_writer;
pub(crate) mod payload_reader;
pub(crate) mod payload_sink;
