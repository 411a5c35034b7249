use crate::Arch;
use crate::Cloud;

#[test]
fn test_cloud_round_trips_through_str() {
    for cloud in Cloud::ALL {
        assert_eq!(cloud.to_string().parse::<Cloud>(), Ok(cloud));
    }
    assert_eq!("GCE".parse::<Cloud>(), Ok(Cloud::Gce));
    assert!("ibm".parse::<Cloud>().is_err());
}

#[test]
fn test_arch_aliases() {
    assert_eq!("x86_64".parse::<Arch>(), Ok(Arch::Amd64));
    assert_eq!("aarch64".parse::<Arch>(), Ok(Arch::Arm64));
    assert_eq!("fips".parse::<Arch>(), Ok(Arch::Fips));
    assert!("riscv".parse::<Arch>().is_err());
}

#[test]
fn test_serde_uses_lowercase_names() {
    assert_eq!(serde_json::to_string(&Cloud::Aws).unwrap(), "\"aws\"");
    assert_eq!(serde_json::from_str::<Arch>("\"arm64\"").unwrap(), Arch::Arm64);
}
