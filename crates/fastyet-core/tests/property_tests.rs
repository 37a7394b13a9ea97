//! Property tests for the statistics and key codec.

use fastyet_core::key::{decode_compile_key, decode_series_key, decode_size_key, encode_series_key, encode_size_key};
use fastyet_core::stats::{Interval, Z_95, average, standard_deviation};
use fastyet_core::{CompilerMode, ProfileMode, System, Version};
use proptest::prelude::*;

fn compiler_mode() -> impl Strategy<Value = CompilerMode> {
    prop::sample::select(CompilerMode::ALL.to_vec())
}

fn profile_mode() -> impl Strategy<Value = ProfileMode> {
    prop::sample::select(ProfileMode::ALL.to_vec())
}

fn system() -> impl Strategy<Value = System> {
    prop::sample::select(System::ALL.to_vec())
}

fn version() -> impl Strategy<Value = Version> {
    (1u32..3, 0u32..100, prop::option::of(0u32..10), any::<bool>()).prop_map(|(major, minor, patch, dotted)| {
        let sep = if dotted { '.' } else { '_' };
        let raw = match patch {
            Some(patch) => format!("{major}{sep}{minor}{sep}{patch}"),
            None => format!("{major}{sep}{minor}"),
        };
        raw.parse().unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn test_interval_brackets_mean(samples in prop::collection::vec(0.0f64..1e6, 1..50)) {
        let interval = Interval::from_samples(&samples).unwrap();
        prop_assert!(interval.low <= interval.mid);
        prop_assert!(interval.mid <= interval.high);
        prop_assert_eq!(interval.mid, average(&samples).unwrap());
    }

    #[test]
    fn test_interval_width(samples in prop::collection::vec(0.0f64..1e6, 1..50)) {
        let interval = Interval::from_samples(&samples).unwrap();
        let sd = standard_deviation(&samples).unwrap();
        let expected = 2.0 * Z_95 * sd / (samples.len() as f64).sqrt();
        prop_assert!((interval.width() - expected).abs() <= 1e-6 * expected.max(1.0));
    }

    #[test]
    fn test_constant_samples_collapse(value in 0.0f64..1e6, n in 1usize..20) {
        let samples = vec![value; n];
        prop_assert!(standard_deviation(&samples).unwrap() <= 1e-9 * value.max(1.0));
        let interval = Interval::from_samples(&samples).unwrap();
        prop_assert!((interval.low - interval.mid).abs() <= 1e-9 * value.max(1.0));
        prop_assert!((interval.high - interval.mid).abs() <= 1e-9 * value.max(1.0));
    }

    #[test]
    fn test_series_key_roundtrip(cm in compiler_mode(), pm in profile_mode(), sys in system()) {
        let raw = encode_series_key(cm, pm, sys);
        let key = decode_series_key(&raw).unwrap();
        prop_assert_eq!((key.compiler_mode, key.profile_mode, key.system), (cm, pm, sys));
        prop_assert_eq!(key.to_string(), raw);
    }

    #[test]
    fn test_compile_key_roundtrip(v in version(), cm in compiler_mode(), pm in profile_mode()) {
        let raw = format!("{v},{cm},{pm}");
        let key = decode_compile_key(&raw).unwrap();
        prop_assert_eq!(&key.version, &v);
        prop_assert_eq!(key.to_string(), raw);
    }

    #[test]
    fn test_size_key_roundtrip(v in version(), cm in compiler_mode()) {
        let raw = encode_size_key(&v, cm);
        let key = decode_size_key(&raw).unwrap();
        prop_assert_eq!(key.version.as_str(), v.as_str());
        prop_assert_eq!(key.compiler_mode, cm);
    }

    #[test]
    fn test_version_order_is_numeric(a in 0u32..200, b in 0u32..200) {
        let va: Version = format!("1_{a}").parse().unwrap();
        let vb: Version = format!("1.{b}.0").parse().unwrap();
        prop_assert_eq!(va.cmp(&vb).is_lt(), a < b);
    }
}
