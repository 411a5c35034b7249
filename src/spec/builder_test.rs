use tracing_test::traced_test;

use crate::arch;
use crate::cpu;
use crate::disable_local_ssd;
use crate::geo;
use crate::machine_type;
use crate::prefer_local_ssd;
use crate::reuse_none;
use crate::ssds;
use crate::terminate_on_migration;
use crate::volume_size;
use crate::zones;
use crate::Arch;
use crate::Cloud;
use crate::CloudCapabilities;
use crate::CompatibilityTable;
use crate::Error;
use crate::LocalSsdSetting;
use crate::ReusePolicy;
use crate::SpecBuilder;
use crate::SpecError;

fn builder() -> SpecBuilder {
    SpecBuilder::default()
}

#[test]
fn test_build_without_options_uses_documented_defaults() {
    for cloud in Cloud::ALL {
        let spec = builder().build(cloud, 3, 8, &[]).unwrap();

        assert_eq!(spec.cloud(), cloud);
        assert_eq!(spec.node_count(), 3);
        assert_eq!(spec.cpus(), 8);
        assert_eq!(spec.local_ssd(), LocalSsdSetting::Default);
        assert!(!spec.geo());
        assert_eq!(spec.arch(), None);
        assert!(!spec.terminate_on_migration());
        assert!(spec.zones().is_empty());
        assert_eq!(spec.volume_size_gb(), None);
        assert_eq!(spec.ssd_count(), None);
        assert_eq!(spec.machine_type(), None);
        assert_eq!(spec.reuse(), &ReusePolicy::All);
    }
}

#[test]
fn test_build_geo_cpu_prefer_local_ssd() {
    let spec = builder()
        .build(Cloud::Aws, 100, 4, &[geo(), cpu(12).unwrap(), prefer_local_ssd()])
        .unwrap();

    assert_eq!(spec.cloud(), Cloud::Aws);
    assert_eq!(spec.node_count(), 100);
    assert_eq!(spec.cpus(), 12);
    assert!(spec.geo());
    assert_eq!(spec.local_ssd(), LocalSsdSetting::PreferOn);
}

#[test]
fn test_local_ssd_last_write_wins() {
    let spec = builder()
        .build(Cloud::Gce, 4, 4, &[prefer_local_ssd(), disable_local_ssd()])
        .unwrap();
    assert_eq!(spec.local_ssd(), LocalSsdSetting::Disable);

    let spec = builder()
        .build(Cloud::Gce, 4, 4, &[disable_local_ssd(), prefer_local_ssd()])
        .unwrap();
    assert_eq!(spec.local_ssd(), LocalSsdSetting::PreferOn);
}

#[test]
#[traced_test]
fn test_overwrite_is_logged_not_rejected() {
    let result = builder().build(Cloud::Gce, 4, 4, &[prefer_local_ssd(), disable_local_ssd()]);

    assert!(result.is_ok());
    assert!(logs_contain("local_ssd overwritten"));
}

#[test]
#[traced_test]
fn test_every_field_overwrite_is_logged() {
    let spec = builder()
        .build(
            Cloud::Gce,
            4,
            4,
            &[
                cpu(4).unwrap(),
                cpu(8).unwrap(),
                volume_size(100).unwrap(),
                volume_size(200).unwrap(),
            ],
        )
        .unwrap();

    assert_eq!(spec.cpus(), 8);
    assert_eq!(spec.volume_size_gb(), Some(200));
    assert!(logs_contain("cpus overwritten"));
    assert!(logs_contain("volume_size_gb overwritten"));
}

#[test]
#[traced_test]
fn test_single_write_and_foreign_machine_type_are_not_overwrites() {
    let spec = builder()
        .build(
            Cloud::Gce,
            4,
            4,
            &[
                machine_type(Cloud::Aws, "m6i.xlarge").unwrap(),
                machine_type(Cloud::Gce, "n2-standard-4").unwrap(),
                cpu(8).unwrap(),
            ],
        )
        .unwrap();

    assert_eq!(spec.machine_type(), Some("n2-standard-4"));
    assert!(!logs_contain("overwritten"));
}

#[test]
fn test_geo_is_order_independent() {
    let options = [cpu(8).unwrap(), geo(), disable_local_ssd(), arch(Arch::Arm64)];
    let first = builder().build(Cloud::Gce, 9, 4, &options).unwrap();

    let mut reversed = options.to_vec();
    reversed.reverse();
    let second = builder().build(Cloud::Gce, 9, 4, &reversed).unwrap();

    assert!(first.geo());
    assert_eq!(first, second);
}

#[test]
fn test_terminate_on_migration_leaves_other_fields() {
    let spec = builder()
        .build(Cloud::Aws, 100, 4, &[cpu(4).unwrap(), terminate_on_migration()])
        .unwrap();

    assert_eq!(spec.node_count(), 100);
    assert_eq!(spec.cpus(), 4);
    assert!(spec.terminate_on_migration());
    assert!(!spec.geo());
    assert_eq!(spec.local_ssd(), LocalSsdSetting::Default);
    assert_eq!(spec.arch(), None);
}

#[test]
fn test_arch_is_set_exactly() {
    let spec = builder()
        .build(Cloud::Aws, 10, 4, &[cpu(16).unwrap(), arch(Arch::Arm64)])
        .unwrap();

    assert_eq!(spec.node_count(), 10);
    assert_eq!(spec.cpus(), 16);
    assert_eq!(spec.arch(), Some(Arch::Arm64));
}

#[test]
fn test_arch_rejected_when_cloud_excludes_it() {
    let table = CompatibilityTable::empty().with_cloud(
        Cloud::Aws,
        CloudCapabilities {
            archs: vec![Arch::Amd64],
            ..Default::default()
        },
    );
    let builder = SpecBuilder::new(table);

    let result = builder.build(Cloud::Aws, 10, 4, &[cpu(16).unwrap(), arch(Arch::Arm64)]);

    match result {
        Err(Error::Spec(SpecError::UnsupportedArch { cloud, arch })) => {
            assert_eq!(cloud, Cloud::Aws);
            assert_eq!(arch, Arch::Arm64);
        }
        other => panic!("expected arch incompatibility, got {other:?}"),
    }
}

#[test]
fn test_fips_is_not_available_on_azure() {
    let result = builder().build(Cloud::Azure, 3, 4, &[arch(Arch::Fips)]);

    assert!(matches!(
        result,
        Err(Error::Spec(SpecError::UnsupportedArch {
            cloud: Cloud::Azure,
            arch: Arch::Fips
        }))
    ));
}

#[test]
fn test_zero_node_count_is_rejected() {
    let result = builder().build(Cloud::Aws, 0, 4, &[]);

    assert!(matches!(result, Err(Error::Spec(SpecError::InvalidNodeCount(0)))));
}

#[test]
fn test_zero_seed_cpus_is_rejected() {
    let result = builder().build(Cloud::Aws, 3, 0, &[]);
    assert!(matches!(result, Err(Error::Spec(SpecError::InvalidCpus(0)))));

    // an explicit cpu option repairs the seed
    let spec = builder().build(Cloud::Aws, 3, 0, &[cpu(2).unwrap()]).unwrap();
    assert_eq!(spec.cpus(), 2);
}

#[test]
fn test_unknown_cloud_is_rejected() {
    let builder = SpecBuilder::new(CompatibilityTable::empty());

    let result = builder.build(Cloud::Gce, 3, 4, &[]);

    assert!(matches!(result, Err(Error::Spec(SpecError::UnknownCloud(Cloud::Gce)))));
}

#[test]
fn test_local_cloud_rejects_prefer_local_ssd_and_terminate() {
    let result = builder().build(Cloud::Local, 1, 4, &[prefer_local_ssd()]);
    assert!(matches!(
        result,
        Err(Error::Spec(SpecError::UnsupportedLocalSsd {
            cloud: Cloud::Local,
            setting: LocalSsdSetting::PreferOn
        }))
    ));

    let result = builder().build(Cloud::Local, 1, 4, &[terminate_on_migration()]);
    assert!(matches!(
        result,
        Err(Error::Spec(SpecError::UnsupportedTerminateOnMigration(Cloud::Local)))
    ));
}

#[test]
fn test_ssd_count_checks() {
    let result = builder().build(Cloud::Azure, 3, 4, &[ssds(5).unwrap()]);
    assert!(matches!(
        result,
        Err(Error::Spec(SpecError::TooManySsds {
            cloud: Cloud::Azure,
            requested: 5,
            max: 4
        }))
    ));

    let result = builder().build(Cloud::Gce, 3, 4, &[ssds(2).unwrap(), disable_local_ssd()]);
    assert!(matches!(
        result,
        Err(Error::Spec(SpecError::SsdsWithLocalSsdDisabled(2)))
    ));

    let spec = builder()
        .build(Cloud::Gce, 3, 4, &[ssds(2).unwrap(), prefer_local_ssd()])
        .unwrap();
    assert_eq!(spec.ssd_count(), Some(2));
}

#[test]
fn test_supplementary_fields() {
    let spec = builder()
        .build(
            Cloud::Gce,
            6,
            4,
            &[
                geo(),
                zones("us-east1-b, us-west1-b,europe-west2-b").unwrap(),
                volume_size(500).unwrap(),
                machine_type(Cloud::Gce, "n2-standard-16").unwrap(),
                machine_type(Cloud::Aws, "m6i.4xlarge").unwrap(),
                reuse_none(),
            ],
        )
        .unwrap();

    assert_eq!(spec.zones(), ["us-east1-b", "us-west1-b", "europe-west2-b"]);
    assert_eq!(spec.volume_size_gb(), Some(500));
    assert_eq!(spec.machine_type(), Some("n2-standard-16"));
    assert_eq!(spec.reuse(), &ReusePolicy::None);
}

#[test]
fn test_identical_inputs_yield_independent_specs() {
    let options = [geo()];
    let a = builder().build(Cloud::Aws, 3, 4, &options).unwrap();
    let b = builder().build(Cloud::Aws, 3, 4, &options).unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_failed_build_does_not_affect_following_builds() {
    let builder = builder();
    assert!(builder.build(Cloud::Aws, 0, 4, &[]).is_err());

    let spec = builder.build(Cloud::Aws, 5, 4, &[geo()]).unwrap();
    assert_eq!(spec.node_count(), 5);
    assert!(spec.geo());
}

#[test]
fn test_display_summarizes_non_default_settings() {
    let spec = builder()
        .build(Cloud::Aws, 4, 8, &[geo(), arch(Arch::Arm64), prefer_local_ssd()])
        .unwrap();
    assert_eq!(spec.to_string(), "n4cpu8-geo-arm64-ssd");

    let spec = builder().build(Cloud::Aws, 1, 4, &[arch(Arch::Amd64), disable_local_ssd()]).unwrap();
    assert_eq!(spec.to_string(), "n1cpu4-nossd");
}

#[test]
fn test_validate_against_rechecks_deserialized_spec() {
    let spec = builder().build(Cloud::Gce, 3, 4, &[arch(Arch::Fips)]).unwrap();
    let json = serde_json::to_string(&spec).unwrap();
    let restored: crate::ClusterSpec = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, spec);
    assert!(restored.validate_against(&CompatibilityTable::default()).is_ok());

    let strict = CompatibilityTable::empty().with_cloud(Cloud::Gce, CloudCapabilities::default());
    assert_eq!(
        restored.validate_against(&strict),
        Err(SpecError::UnsupportedArch {
            cloud: Cloud::Gce,
            arch: Arch::Fips
        })
    );
}

#[test]
fn test_deserialize_rejects_invalid_spec() {
    let zero_nodes = r#"{"cloud":"gce","node_count":0,"cpus":4}"#;
    assert!(serde_json::from_str::<crate::ClusterSpec>(zero_nodes).is_err());

    let local_fips = r#"{"cloud":"local","node_count":3,"cpus":4,"arch":"fips","local_ssd":"prefer-on","terminate_on_migration":true}"#;
    let err = serde_json::from_str::<crate::ClusterSpec>(local_fips).unwrap_err();
    assert!(err.to_string().contains("fips"), "{err}");

    let minimal = r#"{"cloud":"aws","node_count":3,"cpus":4}"#;
    let spec: crate::ClusterSpec = serde_json::from_str(minimal).unwrap();
    assert_eq!(spec, builder().build(Cloud::Aws, 3, 4, &[]).unwrap());
}
