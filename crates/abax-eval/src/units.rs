//! Physical unit conversion.
//!
//! Dimensional analysis over the seven SI base units. Unit expressions
//! admit products, quotients and powers (`kg*m^2*s^-2`, `m/s`, `m²`),
//! SI and binary prefixes, long names with plurals, and the temperature
//! addend for degree scales.

use crate::context::Ctx;
use crate::value::Value;
use abax_common::{CalcError, CalcResult, Kind};
use abax_num::{Dec, Flt};
use once_cell::sync::Lazy;

const N_BASE: usize = 7;
const BASE_UNITS: [&str; N_BASE] = ["m", "kg", "s", "A", "K", "mol", "cd"];

struct PrefixDef {
    name: &'static str,
    abbrev: &'static str,
    val: f64,
}

struct UnitDef {
    name: &'static str,
    /// Irregular plural; regular plurals just append `s`.
    names: Option<&'static str>,
    abbrev: &'static str,
    val: f64,
    unit: &'static str,
    addend: f64,
}

const PREFIXES: &[PrefixDef] = &[
    PrefixDef { name: "yocto", abbrev: "y", val: 1e-24 },
    PrefixDef { name: "zepto", abbrev: "z", val: 1e-21 },
    PrefixDef { name: "atto", abbrev: "a", val: 1e-18 },
    PrefixDef { name: "femto", abbrev: "f", val: 1e-15 },
    PrefixDef { name: "pico", abbrev: "p", val: 1e-12 },
    PrefixDef { name: "nano", abbrev: "n", val: 1e-9 },
    PrefixDef { name: "micro", abbrev: "\u{b5}", val: 1e-6 },
    PrefixDef { name: "milli", abbrev: "m", val: 1e-3 },
    PrefixDef { name: "centi", abbrev: "c", val: 1e-2 },
    PrefixDef { name: "deci", abbrev: "d", val: 1e-1 },
    PrefixDef { name: "kibi", abbrev: "Ki", val: 1024.0 },
    PrefixDef { name: "mebi", abbrev: "Mi", val: 1048576.0 },
    PrefixDef { name: "gibi", abbrev: "Gi", val: 1073741824.0 },
    PrefixDef { name: "tebi", abbrev: "Ti", val: 1099511627776.0 },
    PrefixDef { name: "pebi", abbrev: "Pi", val: 1125899906842624.0 },
    PrefixDef { name: "exbi", abbrev: "Ei", val: 1152921504606846976.0 },
    PrefixDef { name: "zebi", abbrev: "Zi", val: 1180591620717411303424.0 },
    PrefixDef { name: "yobi", abbrev: "Yi", val: 1208925819614629174706176.0 },
    PrefixDef { name: "deca", abbrev: "da", val: 10.0 },
    PrefixDef { name: "hecto", abbrev: "h", val: 100.0 },
    PrefixDef { name: "kilo", abbrev: "k", val: 1000.0 },
    PrefixDef { name: "mega", abbrev: "M", val: 1e6 },
    PrefixDef { name: "giga", abbrev: "G", val: 1e9 },
    PrefixDef { name: "tera", abbrev: "T", val: 1e12 },
    PrefixDef { name: "peta", abbrev: "P", val: 1e15 },
    PrefixDef { name: "exa", abbrev: "E", val: 1e18 },
    PrefixDef { name: "zetta", abbrev: "Z", val: 1e21 },
    PrefixDef { name: "yotta", abbrev: "Y", val: 1e24 },
];

macro_rules! unit {
    ($name:expr, $abbrev:expr, $val:expr, $unit:expr) => {
        UnitDef { name: $name, names: None, abbrev: $abbrev, val: $val, unit: $unit, addend: 0.0 }
    };
    ($name:expr, $abbrev:expr, $val:expr, $unit:expr, addend = $addend:expr) => {
        UnitDef { name: $name, names: None, abbrev: $abbrev, val: $val, unit: $unit, addend: $addend }
    };
    ($name:expr, plural = $names:expr, $abbrev:expr, $val:expr, $unit:expr) => {
        UnitDef { name: $name, names: Some($names), abbrev: $abbrev, val: $val, unit: $unit, addend: 0.0 }
    };
}

const UNITS: &[UnitDef] = &[
    // length
    unit!("meter", "m", 1.0, "m"),
    unit!("foot", plural = "feet", "ft", 0.3048, "m"),
    unit!("inch", plural = "inches", "in", 0.0254, "m"),
    unit!("mil", "mil", 1e-3, "in"),
    unit!("mile", "mi", 5280.0, "ft"),
    unit!("micron", "", 1e-6, "m"),
    unit!("nautical mile", "NM", 1852.0, "m"),
    unit!("", "nmi", 1852.0, "m"),
    unit!("angstrom", "", 1e-10, "m"),
    unit!("light year", "ly", 9.4607304725808e15, "m"),
    unit!("parsec", "pc", 3.08567782e16, "m"),
    unit!("astronomical unit", "AU", 149597870691.0, "m"),
    // surface
    unit!("acre", "ac", 4046.8564224, "m^2"),
    unit!("are", "a", 100.0, "m^2"),
    // volume
    unit!("liter", "L", 1.0, "dm^3"),
    // time
    unit!("second", "s", 1.0, "s"),
    unit!("minute", "min", 60.0, "s"),
    unit!("hour", "h", 3600.0, "s"),
    unit!("day", "d", 24.0, "h"),
    unit!("week", "wk", 7.0, "day"),
    unit!("month", "mo", 30.0, "day"),
    unit!("year", "y", 365.25, "day"),
    unit!("hertz", "Hz", 1.0, "s^-1"),
    // speed
    unit!("", "fph", 1.0, "ft/h"),
    unit!("", "mph", 1.0, "mi/h"),
    unit!("speed of light", "c", 2.99792458e8, "m/s"),
    unit!("knot", "kn", 1.0, "NM/h"),
    // acceleration
    unit!("gravity", "G", 9.80665, "m/s^2"),
    // pressure
    unit!("pascal", "Pa", 1.0, "N/m^2"),
    unit!("atmosphere", "atm", 101325.0, "Pa"),
    unit!("bar", "bar", 1e5, "Pa"),
    unit!("torr", "torr", 101325.0 / 760.0, "Pa"),
    // mass
    unit!("gramm", "g", 1e-3, "kg"),
    unit!("tonne", "t", 1000.0, "kg"),
    unit!("carat", "ct", 0.2, "g"),
    unit!("pound", "lb", 0.45359237, "kg"),
    unit!("ounce", "oz", 1.0 / 16.0, "lb"),
    // temperature
    unit!("kelvin", "K", 1.0, "K"),
    unit!("degree Celsius", "\u{b0}C", 1.0, "K", addend = 273.15),
    unit!("degree Rankine", "\u{b0}R", 5.0 / 9.0, "K"),
    unit!("degree Farenheit", "\u{b0}F", 5.0 / 9.0, "K", addend = 459.67),
    // energy
    unit!("joule", "J", 1.0, "kg*m^2*s^-2"),
    unit!("electronvolt", "eV", 1.602176e-19, "J"),
    unit!("calorie", "cal", 4.1868, "J"),
    unit!("Calorie", "Cal", 4.1868e3, "J"),
    unit!("ton of TNT", "tTNT", 4.184, "GJ"),
    unit!("ton of oil equivalent", "TOE", 41.868, "GJ"),
    // power
    unit!("watt", "W", 1.0, "J/s"),
    unit!("horsepower", "hp", 735.49875, "W"),
    // force
    unit!("newton", "N", 1.0, "kg*m*s^-2"),
    // electric current
    unit!("ampere", "A", 1.0, "A"),
    // electric charge
    unit!("coulomb", "C", 1.0, "A*s"),
    // electric capacitance
    unit!("farad", "F", 1.0, "C/V"),
    // electromotive force
    unit!("volt", "V", 1.0, "kg*m^2*A^-1*s^-3"),
    // electrical resistance
    unit!("ohm", "", 1.0, "V/A"),
    // electrical conductance
    unit!("siemens", "S", 1.0, "A/V"),
    // magnetic flux
    unit!("weber", "Wb", 1.0, "J/A"),
    // magnetic field
    unit!("tesla", "T", 1.0, "Wb/m^2"),
    // inductance
    unit!("henry", "H", 1.0, "Wb/A"),
    // luminous flux
    unit!("lumen", "lm", 1.0, "cd*sr"),
    // illuminance
    unit!("lux", "lx", 1.0, "lm/m^2"),
    // radioactivity
    unit!("becquerel", "Bq", 1.0, "s^-1"),
    // absorbed dose
    unit!("gray", "Gy", 1.0, "J/kg"),
    // equivalent dose
    unit!("sievert", "Sv", 1.0, "J/kg"),
    // catalytic activity
    unit!("katal", "kat", 1.0, "mol/s"),
    // angle
    unit!("radian", "rad", 1.0, "rad"),
    unit!("degree", "\u{b0}", std::f64::consts::PI / 180.0, "rad"),
    unit!("gradian", "grad", std::f64::consts::PI / 200.0, "rad"),
    // solid angle
    unit!("steradian", "sr", 1.0, "sr"),
    // information
    unit!("bit", "bit", 9.569940e-24, "J/K"),
    unit!("nibble", "", 4.0, "bit"),
    unit!("byte", "B", 8.0, "bit"),
];

#[derive(Debug, Clone, Copy, PartialEq)]
struct UnitValue {
    val: f64,
    dims: [i32; N_BASE],
    addend: f64,
}

impl UnitValue {
    fn dimensionless(val: f64) -> UnitValue {
        UnitValue {
            val,
            dims: [0; N_BASE],
            addend: 0.0,
        }
    }
}

fn remove_spaces(s: &str) -> String {
    s.chars().filter(|c| *c != ' ' && *c != '\t').collect()
}

/// Precomputed lowercased, space-stripped long names with plurals.
static LONG_NAMES: Lazy<Vec<(String, String)>> = Lazy::new(|| {
    UNITS
        .iter()
        .map(|ud| {
            let base = remove_spaces(ud.name).to_lowercase();
            let plural = match ud.names {
                Some(p) => p.to_string(),
                None => format!("{base}s"),
            };
            (base, plural)
        })
        .collect()
});

/// Table index by exact abbreviation or (lowercased, space-stripped)
/// long name with plural handling.
fn find_unit_name(name: &str, is_long: bool) -> Option<usize> {
    if name.is_empty() {
        return None;
    }
    if is_long {
        for (i, (base, plural)) in LONG_NAMES.iter().enumerate() {
            if !base.is_empty() && (base == name || plural == name) {
                return Some(i);
            }
        }
    } else {
        for (i, ud) in UNITS.iter().enumerate() {
            if !ud.abbrev.is_empty() && ud.abbrev == name {
                return Some(i);
            }
        }
    }
    None
}

/// Resolve a single unit factor (no powers, no products).
fn find_unit1(unit: &str) -> Option<UnitValue> {
    let name = remove_spaces(unit);
    let namel = name.to_lowercase();

    for (i, base) in BASE_UNITS.iter().enumerate() {
        if name == *base {
            let mut r = UnitValue::dimensionless(1.0);
            r.dims[i] = 1;
            return Some(r);
        }
    }
    // dimensionless pseudo-units
    if name == "rad" || name == "sr" {
        return Some(UnitValue::dimensionless(1.0));
    }
    if let Some(i) = find_unit_name(&name, false).or_else(|| find_unit_name(&namel, true)) {
        let mut r = find_unit(UNITS[i].unit)?;
        r.addend = UNITS[i].addend;
        r.val *= UNITS[i].val;
        return Some(r);
    }
    // "square X" / "cubic X"
    for (i, word) in ["square", "cubic"].iter().enumerate() {
        if let Some(rest) = namel.strip_prefix(word) {
            let mut r = find_unit(rest)?;
            let p = (2 + i) as i32;
            r.val = r.val.powi(p);
            for d in r.dims.iter_mut() {
                *d *= p;
            }
            return Some(r);
        }
    }
    // long prefix + long name
    for pd in PREFIXES {
        if let Some(rest) = namel.strip_prefix(pd.name) {
            if let Some(i) = find_unit_name(rest, true) {
                let mut r = find_unit(UNITS[i].unit)?;
                r.val *= UNITS[i].val * pd.val;
                return Some(r);
            }
        }
    }
    // abbreviated prefix + abbreviation
    for pd in PREFIXES {
        if let Some(rest) = name.strip_prefix(pd.abbrev) {
            if let Some(i) = find_unit_name(rest, false) {
                let mut r = find_unit(UNITS[i].unit)?;
                r.val *= UNITS[i].val * pd.val;
                return Some(r);
            }
        }
    }
    None
}

/// Parse a full unit expression: `unit[^n][*unit…][/unit^n]`, with `²`
/// and `³` accepted as powers.
fn find_unit(expr: &str) -> Option<UnitValue> {
    let chars: Vec<char> = expr.chars().collect();
    let mut pos = 0;
    let mut is_den = false;
    let mut acc: Option<UnitValue> = None;
    loop {
        let start = pos;
        while pos < chars.len()
            && !matches!(chars[pos], '^' | '*' | '/' | '\u{b2}' | '\u{b3}')
        {
            pos += 1;
        }
        let name: String = chars[start..pos].iter().collect();
        let mut r1 = find_unit1(&name)?;
        let mut power: Option<i32> = None;
        if pos < chars.len() && (chars[pos] == '\u{b2}' || chars[pos] == '\u{b3}') {
            power = Some(if chars[pos] == '\u{b2}' { 2 } else { 3 });
            pos += 1;
        } else if pos < chars.len() && chars[pos] == '^' {
            pos += 1;
            while pos < chars.len() && chars[pos] == ' ' {
                pos += 1;
            }
            let mut negative = false;
            if pos < chars.len() && (chars[pos] == '+' || chars[pos] == '-') {
                negative = chars[pos] == '-';
                pos += 1;
            }
            let mut po = 0i32;
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                po = po * 10 + (chars[pos] as i32 - '0' as i32);
                pos += 1;
            }
            power = Some(if negative { -po } else { po });
        }
        if let Some(p) = power {
            r1.val = r1.val.powi(p);
            for d in r1.dims.iter_mut() {
                *d *= p;
            }
        }
        match &mut acc {
            None if !is_den => acc = Some(r1),
            None => return None,
            Some(acc) => {
                if is_den {
                    acc.val /= r1.val;
                    for (d, e) in acc.dims.iter_mut().zip(r1.dims.iter()) {
                        *d -= e;
                    }
                } else {
                    acc.val *= r1.val;
                    for (d, e) in acc.dims.iter_mut().zip(r1.dims.iter()) {
                        *d += e;
                    }
                }
            }
        }
        while pos < chars.len() && chars[pos] == ' ' {
            pos += 1;
        }
        if pos < chars.len() && chars[pos] == '*' {
            pos += 1;
        } else if pos < chars.len() && chars[pos] == '/' {
            pos += 1;
            is_den = true;
        } else if pos < chars.len() {
            return None;
        } else {
            break;
        }
    }
    acc
}

fn dims_string(r: &UnitValue) -> String {
    let parts: Vec<String> = BASE_UNITS
        .iter()
        .zip(r.dims.iter())
        .filter(|(_, d)| **d != 0)
        .map(|(u, d)| format!("{u}^{d}"))
        .collect();
    if parts.is_empty() {
        "unitless".to_string()
    } else {
        parts.join("*")
    }
}

fn is_temperature(r: &UnitValue) -> bool {
    r.dims
        .iter()
        .enumerate()
        .all(|(i, d)| *d == if i == 4 { 1 } else { 0 })
}

fn value_to_f64(ctx: &Ctx, v: &Value) -> CalcResult<f64> {
    match v {
        Value::Bool(b) => Ok(*b as i64 as f64),
        Value::Int(_) | Value::Frac(_) | Value::Dec(_) => {
            match crate::convert::convert(ctx, v.clone(), &abax_common::Type::simple(Kind::Decimal))?
            {
                Value::Dec(d) => Ok(d.to_f64()),
                _ => Err(CalcError::ty("number expected")),
            }
        }
        Value::Float(f) => Ok(f.to_dec_exact().to_f64()),
        _ => Err(CalcError::ty("number expected")),
    }
}

/// `convert(value, "from", "to")`.
pub fn convert_units(ctx: &Ctx, v: Value, from: &str, to: &str) -> CalcResult<Value> {
    let is_float = v.kind() == Kind::Float;
    let mut val = value_to_f64(ctx, &v)?;
    let r1 = find_unit(from)
        .ok_or_else(|| CalcError::syntax(format!("unknown unit: '{from}'")))?;
    let r2 =
        find_unit(to).ok_or_else(|| CalcError::syntax(format!("unknown unit: '{to}'")))?;
    if r1.dims != r2.dims {
        return Err(CalcError::range(format!(
            "Unit dimensions do not match: {} != {}",
            dims_string(&r1),
            dims_string(&r2)
        )));
    }
    if is_temperature(&r1) {
        val += r1.addend;
        val = val * r1.val / r2.val;
        val -= r2.addend;
    } else {
        val = val * r1.val / r2.val;
    }
    if is_float {
        Ok(Value::Float(Flt::from_f64(val, ctx.num.float_prec)))
    } else {
        Ok(Value::Dec(Dec::from_f64(val).round_prec(ctx.num.dec_prec)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_value;

    #[test]
    fn speed_of_light_in_km_per_s() {
        let c = Ctx::new();
        let r = convert_units(&c, Value::int(1), "c", "km/s").unwrap();
        assert_eq!(format_value(&c, &r), "299792.458");
    }

    #[test]
    fn celsius_to_farenheit_uses_addends() {
        let c = Ctx::new();
        let r = convert_units(&c, Value::int(100), "\u{b0}C", "\u{b0}F").unwrap();
        assert_eq!(format_value(&c, &r), "211.9999999999999");
    }

    #[test]
    fn long_names_powers_and_superscripts() {
        let c = Ctx::new();
        let r = convert_units(&c, Value::int(100), "square feet", "m^2").unwrap();
        assert_eq!(format_value(&c, &r), "9.290304000000001");
        let r = convert_units(&c, Value::int(20000), "m\u{b2}", "ha").unwrap();
        assert_eq!(format_value(&c, &r), "2.0");
    }

    #[test]
    fn mismatched_dimensions_fail() {
        let c = Ctx::new();
        let e = convert_units(&c, Value::int(1), "m", "s").unwrap_err();
        assert_eq!(e.kind, abax_common::CalcErrorKind::Range);
        assert!(e.message.contains("do not match"));
    }
}
