/// Generates the default `config.toml` contents with explanatory comments.
///
/// This is used by `taskshift init` to create a starter config file that
/// users can immediately edit.
pub fn generate_config() -> String {
    r##"# TaskShift configuration
# Location: ~/.config/taskshift/config.toml
#
# While a fullscreen application runs on the primary monitor, the primary
# taskbar moves to a secondary monitor. It comes back when the application
# closes.

[engine]
# Which secondary monitor receives the taskbar.
# 1 = first non-primary monitor, 2 = second non-primary monitor, etc.
secondary_monitor = 1
# How often to check for fullscreen applications, in milliseconds.
# 2000-3000 is plenty; higher values use less CPU.
poll_interval_ms = 2000

[logging]
# Enable logging to ~/.config/taskshift/logs/taskshift.log and to the
# debugger output (viewable with DbgView). Leave off while gaming.
enabled = false
# Minimum log level: "debug", "info", "warn", or "error".
level = "info"
# Maximum log file size in MB before rotation.
max_file_mb = 10

[symbols]
# DbgHelp search path used to locate the taskbar's internal functions.
# Empty uses the Microsoft symbol server with a cache in the temp directory.
search_path = ""
"##
    .to_string()
}
