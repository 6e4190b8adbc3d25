pub mod constant {
    pub const SEED: u64 = 42;

    // Simulated orders per run, inclusive.
    pub const ORDER_COUNT_MIN: usize = 6;
    pub const ORDER_COUNT_MAX: usize = 12;
    pub const WINDOW_DAYS: i64 = 7;

    pub const Z_SCORE_THRESHOLD: f64 = 1.5;
    pub const FAR_CUSTOMER_THRESHOLD_KM: f64 = 6.0;
    pub const BUSY_CUSTOMER_ORDER_THRESHOLD: usize = 2;

    pub const TWO_OPT: bool = true;
    pub const RETURN_TO_DEPOT: bool = false;

    pub const RENDER_PNG_PATH: &str = "smartcoffee_routes.png";
    pub const CANVAS_SIZE: (u32, u32) = (1000, 800);

    pub const DEPOTS: [&str; 3] = ["Cafetería Norte", "Cafetería Centro", "Cafetería Sur"];

    pub const CUSTOMERS: [&str; 6] = [
        "Cliente A",
        "Cliente B",
        "Cliente C",
        "Cliente D",
        "Cliente E",
        "Cliente F",
    ];

    /// Base road network in kilometres. Every entry is inserted in both directions.
    pub const BASE_ROUTES: [(&str, &str, f64); 13] = [
        ("Cafetería Norte", "Cliente A", 4.0),
        ("Cafetería Norte", "Cliente B", 6.0),
        ("Cafetería Centro", "Cliente B", 3.0),
        ("Cafetería Centro", "Cliente C", 4.0),
        ("Cafetería Centro", "Cliente D", 5.0),
        ("Cafetería Sur", "Cliente D", 3.0),
        ("Cafetería Sur", "Cliente E", 4.0),
        ("Cafetería Sur", "Cliente F", 6.0),
        ("Cliente A", "Cliente B", 2.0),
        ("Cliente B", "Cliente C", 3.0),
        ("Cliente C", "Cliente D", 4.0),
        ("Cliente D", "Cliente E", 5.0),
        ("Cliente E", "Cliente F", 2.0),
    ];

    // red, blue, purple, brown, cyan
    pub const ROUTE_PALETTE: [(u8, u8, u8); 5] = [
        (255, 0, 0),
        (0, 0, 255),
        (128, 0, 128),
        (165, 42, 42),
        (0, 255, 255),
    ];
}
