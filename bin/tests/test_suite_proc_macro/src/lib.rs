use std::path::Path;

use quote::{format_ident, quote};

/// Emits one `#[test]` per `.calc` file found below `bin/tests`, each calling `calc_expect`.
/// The test is named after the file's path, e.g. `suite/division.calc` -> `test_suite_division`.
#[proc_macro]
pub fn generate_tests(_: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let root_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    let tests = walkdir::WalkDir::new(&root_dir)
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|entry| entry.path().extension() == Some("calc".as_ref()))
        .filter_map(|entry| {
            let case_name = entry.path().strip_prefix(&root_dir).ok()?.with_extension("");
            let test_ident = format_ident!(
                "test_{}",
                case_name.to_string_lossy().replace(['/', '\\', '-', '.'], "_")
            );
            let case_file = entry.path().to_string_lossy().into_owned();
            Some(quote! {
                #[test]
                fn #test_ident() {
                    let code = std::fs::read_to_string(#case_file)
                        .unwrap_or_else(|e| panic!("reading {}: {}", #case_file, e));
                    calc_expect(&code);
                }
            })
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
