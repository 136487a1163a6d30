use taskshift_core::Rect;

/// Formats a rectangle as `WxH at (x, y)`.
#[cfg_attr(not(windows), allow(dead_code))]
fn area(r: &Rect) -> String {
    format!("{}x{} at ({}, {})", r.width, r.height, r.x, r.y)
}

/// Prints a table of all monitors with their role in the current config.
#[cfg(windows)]
pub fn execute() {
    use comfy_table::presets::UTF8_FULL;
    use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
    use taskshift_core::config;
    use taskshift_core::monitor::nth_secondary;

    let monitors = match taskshift_windows::monitor::enumerate_monitors() {
        Ok(monitors) => monitors,
        Err(e) => {
            eprintln!("Error: could not enumerate monitors: {e}");
            std::process::exit(1);
        }
    };
    let index = config::load().engine.secondary_monitor;
    let secondary = nth_secondary(&monitors, index);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("HMONITOR"),
            Cell::new("Device"),
            Cell::new("Role"),
            Cell::new("Bounds"),
            Cell::new("Width").set_alignment(CellAlignment::Right),
            Cell::new("Height").set_alignment(CellAlignment::Right),
            Cell::new("Work area"),
        ]);

    for m in &monitors {
        let role = if m.is_primary {
            "primary".to_string()
        } else if Some(m.id) == secondary {
            format!("secondary #{index}")
        } else {
            String::new()
        };
        let r = &m.rect;
        table.add_row(vec![
            Cell::new(format!("0x{:X}", m.id.as_raw())),
            Cell::new(&m.device),
            Cell::new(role),
            Cell::new(format!("({}, {})", r.x, r.y)),
            Cell::new(r.width).set_alignment(CellAlignment::Right),
            Cell::new(r.height).set_alignment(CellAlignment::Right),
            Cell::new(area(&m.work_area)),
        ]);
    }

    println!("{table}");
    println!("\n{} monitors found", monitors.len());
    if secondary.is_none() {
        println!("Secondary monitor #{index} is not present; the taskbar would stay put.");
    }
}

#[cfg(not(windows))]
pub fn execute() {
    super::super::requires_windows("debug monitors");
}
