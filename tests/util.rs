//! Shared test utilities for integration tests
//!
//! Provides common fixture creation used across multiple test files.

#![allow(dead_code)]

use assert_fs::prelude::*;

/// Competitive-programming style project: a definitions header with a
/// marker, a utility header with a paired source file, and a main file.
pub fn make_project() -> assert_fs::TempDir
{
    // Initialize the temporary project root
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child("src/defines.hpp")
        .write_str(
            "#ifndef SRC_DEFINES_HPP\n\
             #define SRC_DEFINES_HPP\n\
             #pragma GCC optimize(\"Ofast,unroll-loops\")\n\
             \n\
             // PASTE ALL INCLUDES!\n\
             \n\
             using int64 = signed long long;\n\
             \n\
             #endif\n",
        )
        .expect("write defines");

    tmp.child("src/utils.hpp")
        .write_str(
            "#ifndef SRC_UTILS_HPP\n\
             #define SRC_UTILS_HPP\n\
             #include <iostream>\n\
             #include \"src/defines.hpp\"\n\
             int64 twice(int64 x);\n\
             #endif\n",
        )
        .expect("write utils.hpp");

    tmp.child("src/utils.cpp")
        .write_str(
            "#include \"src/utils.hpp\"\n\
             #include <cassert>\n\
             int64 twice(int64 x) { return 2 * x; }\n",
        )
        .expect("write utils.cpp");

    tmp.child("main.cpp")
        .write_str(
            "#include <iostream>\n\
             #include \"src/utils.hpp\"\n\
             int main() { std::cout << twice(21); }\n",
        )
        .expect("write main.cpp");

    // Return the prepared directory to the caller
    tmp
}

/// Two headers including each other.
pub fn make_cycle() -> assert_fs::TempDir
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child("main.cpp")
        .write_str("#include \"a.hpp\"\nint main() {}\n")
        .expect("write main.cpp");
    tmp.child("a.hpp")
        .write_str("#include \"b.hpp\"\n")
        .expect("write a.hpp");
    tmp.child("b.hpp")
        .write_str("#include \"a.hpp\"\n")
        .expect("write b.hpp");

    tmp
}
