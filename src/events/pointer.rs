use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Код кнопки BTN_LEFT в evdev - единственная кнопка, влияющая на
/// захват окна (перетаскивание в оконных менеджерах делается левой)
pub const BTN_LEFT_CODE: u16 = 0x110;

/// Человекочитаемые имена кнопок мыши для логирования
static BUTTON_NAMES: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(0x110, "BTN_LEFT");
    map.insert(0x111, "BTN_RIGHT");
    map.insert(0x112, "BTN_MIDDLE");
    map.insert(0x113, "BTN_SIDE");
    map.insert(0x114, "BTN_EXTRA");
    map
});

pub fn button_name(code: u16) -> &'static str {
    BUTTON_NAMES.get(&code).copied().unwrap_or("Unknown")
}
