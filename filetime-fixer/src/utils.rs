use dialoguer::console::Term;

pub fn format_duration_short(duration: std::time::Duration) -> String {
    let s = humantime::format_duration(duration).to_string();
    s.split(' ').take(2).collect::<Vec<_>>().join(" ")
}

pub fn simulate_indicator(term: &Term, show: bool) -> String {
    if show {
        term.style().bold().apply_to(" (simulate)").to_string()
    } else {
        "".to_string()
    }
}
