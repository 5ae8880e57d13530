#![cfg_attr(coverage_nightly, coverage(off))]

use mockall::mock;

use crate::pal::{MockPlatformTimer, Platform};

mock! {
    #[derive(Debug)]
    pub Platform {
    }

    impl Platform for Platform {
        type Timer = MockPlatformTimer;

        fn new_timer(&self) -> MockPlatformTimer;
    }
}
