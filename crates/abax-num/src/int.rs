//! Arbitrary-precision integer operations that go beyond the `BigInt`
//! operator surface: Euclidean division, modular arithmetic, primality
//! and factoring.

use abax_common::{CalcError, CalcResult};
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// First 95 primes; used for trial division and as the fixed
/// Miller-Rabin bases.
pub const SMALL_PRIMES: [u16; 95] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293,
    307, 311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401, 409, 419,
    421, 431, 433, 439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499,
];

/// Euclidean division: `a = q*b + r` with `0 <= r < |b|`.
pub fn divrem_euclid(a: &BigInt, b: &BigInt) -> CalcResult<(BigInt, BigInt)> {
    if b.is_zero() {
        return Err(CalcError::range("division by zero"));
    }
    let (mut q, mut r) = a.div_rem(b);
    if r.is_negative() {
        if b.is_negative() {
            q += 1;
            r -= b;
        } else {
            q -= 1;
            r += b;
        }
    }
    Ok((q, r))
}

/// Remainder of Euclidean division (always non-negative).
pub fn mod_euclid(a: &BigInt, b: &BigInt) -> CalcResult<BigInt> {
    Ok(divrem_euclid(a, b)?.1)
}

/// Shift by a signed count; negative counts shift right
/// (arithmetically, rounding toward negative infinity).
pub fn shl_signed(a: &BigInt, count: i64) -> CalcResult<BigInt> {
    let magnitude = usize::try_from(count.unsigned_abs())
        .map_err(|_| CalcError::range("shift count too large"))?;
    if count >= 0 {
        if magnitude > 1 << 24 {
            return Err(CalcError::range("shift count too large"));
        }
        Ok(a << magnitude)
    } else {
        Ok(a >> magnitude)
    }
}

/// Modular inverse of `a` modulo `m >= 1`.
pub fn invmod(a: &BigInt, m: &BigInt) -> CalcResult<BigInt> {
    if m.sign() != Sign::Plus {
        return Err(CalcError::range("positive modulus expected"));
    }
    let e = a.extended_gcd(m);
    if !e.gcd.abs().is_one() {
        return Err(CalcError::range("not invertible"));
    }
    let x = if e.gcd.is_negative() { -e.x } else { e.x };
    mod_euclid(&x, m)
}

/// Modular power; a negative exponent inverts the base first.
pub fn pmod(a: &BigInt, b: &BigInt, m: &BigInt) -> CalcResult<BigInt> {
    if m.sign() != Sign::Plus {
        return Err(CalcError::range("positive modulus expected"));
    }
    if b.is_negative() {
        let inv = invmod(a, m)?;
        Ok(inv.modpow(&-b, m))
    } else {
        let base = mod_euclid(a, m)?;
        Ok(base.modpow(b, m))
    }
}

fn divides(d: &BigInt, n: &BigInt) -> bool {
    (n % d).is_zero()
}

/// Miller-Rabin with `t` fixed bases taken from [`SMALL_PRIMES`].
/// The caller has already ruled out small factors.
fn miller_rabin(n: &BigInt, t: usize) -> bool {
    let n1 = n - 1u32;
    let s = n1.trailing_zeros().unwrap_or(0);
    let d = &n1 >> s as usize;
    let t = t.min(SMALL_PRIMES.len());
    'bases: for &a in SMALL_PRIMES.iter().take(t) {
        let mut r = BigInt::from(a).modpow(&d, n);
        if r.is_one() || r == n1 {
            continue;
        }
        for _ in 1..s {
            r = (&r * &r) % n;
            if r.is_one() {
                return false;
            }
            if r == n1 {
                continue 'bases;
            }
        }
        return false;
    }
    true
}

/// Primality test: deterministic trial division over the small-prime
/// table, then Miller-Rabin with `t` rounds (default 64 when `t == 0`).
/// False-positive probability is at most `4^-t`.
pub fn is_prime(n: &BigInt, t: usize) -> bool {
    let t = if t == 0 { 64 } else { t };
    if *n < BigInt::from(2) {
        return false;
    }
    for &p in SMALL_PRIMES.iter() {
        let d = BigInt::from(p);
        if divides(&d, n) {
            return *n == d;
        }
        if *n < &d * &d {
            return true;
        }
    }
    miller_rabin(n, t)
}

/// Smallest prime strictly greater than `n`.
pub fn next_prime(n: &BigInt) -> BigInt {
    let mut n = n.clone();
    loop {
        n += 1u32;
        if is_prime(&n, 0) {
            return n;
        }
    }
}

/// Prime factorisation of `n >= 1` in ascending order with multiplicity.
/// Trial division; once the remaining cofactor passes the primality
/// test it is appended as-is.
pub fn factor(n: &BigInt) -> CalcResult<Vec<BigInt>> {
    if n.sign() != Sign::Plus {
        return Err(CalcError::range("positive integer expected"));
    }
    let mut n = n.clone();
    let mut out = Vec::new();
    let two = BigInt::from(2u32);
    while divides(&two, &n) {
        out.push(two.clone());
        n /= &two;
    }
    let mut d = BigInt::from(3u32);
    while !n.is_one() {
        if is_prime(&n, 0) {
            out.push(n);
            break;
        }
        while !divides(&d, &n) {
            d += 2u32;
        }
        loop {
            out.push(d.clone());
            n /= &d;
            if !divides(&d, &n) {
                break;
            }
        }
    }
    Ok(out)
}

/// Floor of log2; `ilog2(0) = -1` by convention.
pub fn ilog2(n: &BigInt) -> CalcResult<i64> {
    if n.is_negative() {
        return Err(CalcError::range("non-negative integer expected"));
    }
    Ok(n.bits() as i64 - 1)
}

/// Count of trailing zero bits; `ctz(0) = -1` by convention.
pub fn ctz(n: &BigInt) -> i64 {
    match n.trailing_zeros() {
        Some(z) => z as i64,
        None => -1,
    }
}

pub fn factorial(n: &BigInt) -> CalcResult<BigInt> {
    if n.is_negative() {
        return Err(CalcError::range("non-negative integer expected"));
    }
    let n = n
        .to_u64()
        .ok_or_else(|| CalcError::range("argument too large"))?;
    let mut r = BigInt::one();
    for i in 2..=n {
        r *= i;
    }
    Ok(r)
}

/// Binomial coefficient `C(n, k)`.
pub fn binomial(n: &BigInt, k: &BigInt) -> CalcResult<BigInt> {
    if n.is_negative() || k.is_negative() {
        return Err(CalcError::range("non-negative integers expected"));
    }
    if k > n {
        return Ok(BigInt::zero());
    }
    let k = k
        .to_u64()
        .ok_or_else(|| CalcError::range("argument too large"))?;
    let k = match (n - BigInt::from(k)).to_u64() {
        Some(nk) if nk < k => nk,
        _ => k,
    };
    let mut r = BigInt::one();
    for i in 0..k {
        r = r * (n - i) / (i + 1);
    }
    Ok(r)
}
