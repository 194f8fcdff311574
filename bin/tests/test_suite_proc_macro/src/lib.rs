use quote::{format_ident, quote};

/// Generates one `#[test]` per `.lox` file below `bin/tests`, each calling `lox_expect`.
#[proc_macro]
pub fn generate_tests(_: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let root_dir = format!("{}/..", env!("CARGO_MANIFEST_DIR"));
    let mut test_files = walkdir::WalkDir::new(&root_dir)
        .into_iter()
        .flatten()
        .filter(|entry| entry.path().extension() == Some("lox".as_ref()))
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();
    test_files.sort();

    let tests = test_files.iter().map(|path| {
        let test_file_path = path.to_string_lossy();
        let relative_test_path =
            path.strip_prefix(&root_dir).unwrap_or(path).to_string_lossy().into_owned();
        let test_ident = format_ident!(
            "test_{}",
            relative_test_path.trim_end_matches(".lox").replace(['/', '\\', '-', '.'], "_")
        );
        quote! {
            #[test]
            fn #test_ident() {
                lox_expect(std::fs::read_to_string(#test_file_path).unwrap().as_str());
            }
        }
    });

    quote! {
        #[ctor::ctor]
        fn init() {
            let _ = env_logger::builder().is_test(true).try_init();
        }

        #(#tests)*
    }
    .into()
}
