//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements              | Connects to               |
//! |----------------|-------------------------|---------------------------|
//! | `serial`       | LineReader, LineWriter  | OS serial device          |
//! | `simulated`    | LineReader, LineWriter  | in-process board model    |
//! | `channel_sink` | EventSink               | presentation thread       |
//! | `log_sink`     | EventSink               | `log` facade              |
//! | `config_file`  | ConfigPort              | JSON file on disk         |

pub mod channel_sink;
pub mod config_file;
pub mod log_sink;
pub mod serial;
pub mod simulated;
