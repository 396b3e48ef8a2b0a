//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements   | Connects to                      |
//! |---------------|--------------|----------------------------------|
//! | `clock`       | ClockPort    | Host clock + async-io-mini timer |
//! | `config_file` | ConfigPort   | JSON file                        |
//! | `csv_log`     | DataLogPort  | CSV file                         |
//! | `hardware`    | ActuatorPort | H-bridge PWM, relay GPIO         |
//! | `log_sink`    | EventSink    | Log output                       |
//! | `notifier`    | NotifierPort | Log output                       |
//! | `sim`         | SensorPort   | Thermal model                    |
//! |               | ActuatorPort |                                  |
//! | `sunset`      | WeatherPort  | Fixed local sunset time          |

pub mod clock;
pub mod config_file;
pub mod csv_log;
pub mod hardware;
pub mod log_sink;
pub mod notifier;
pub mod sim;
pub mod sunset;
