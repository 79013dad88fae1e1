pub mod application {
    pub mod menu {
        pub mod decode;
    }
}

pub mod domain {
    pub mod logger;
    pub mod menu {
        pub mod errors;
        pub mod line_filter;
        pub mod model;
        pub mod services;
        pub mod value_objects;
        pub mod use_cases {
            pub mod decode;
        }
    }
    pub mod shared {
        pub mod value_objects;
    }
}
