// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// The process-wide logger is shared by every test in a binary, so this file holds a single test.

use std::fs;
use std::sync::Barrier;

use tempfile::TempDir;

#[test]
fn test_process_wide_logger_lifecycle() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let threads = 8;
    let barrier = Barrier::new(threads);

    std::thread::scope(|s| {
        for i in 0..threads {
            let barrier = &barrier;
            let dir = temp_dir.path().join(format!("init{i}"));
            s.spawn(move || {
                barrier.wait();
                daylog::init_once(&dir, "svc");
                daylog::info(format_args!("hello from {i}"));
            });
        }
    });

    let created = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect::<Vec<_>>();
    assert_eq!(created.len(), 1, "{created:?}");

    // later calls do nothing
    daylog::init_once(temp_dir.path().join("late"), "svc");
    assert!(!temp_dir.path().join("late").exists());

    log::warn!("through the log crate");
    let first = daylog::global().log_file().unwrap();
    assert!(first.starts_with(&created[0]));
    daylog::global().flush().unwrap();

    let content = fs::read_to_string(&first).unwrap();
    assert_eq!(content.matches("[INFO]: hello from").count(), threads);
    assert!(
        content.contains("[WARN]: through the log crate"),
        "{content}"
    );

    let switched = temp_dir.path().join("switched");
    daylog::set_log_file(&switched, "svc");
    daylog::error("after switch");
    let second = daylog::global().log_file().unwrap();
    assert!(second.starts_with(&switched));

    daylog::close();
    daylog::close();
    assert!(daylog::global().log_file().is_none());
    daylog::info("nowhere to go");

    let content = fs::read_to_string(&second).unwrap();
    let mut lines = content.lines();
    assert!(lines.next().unwrap().ends_with("[ERROR]: after switch"));
    assert!(
        lines.any(|line| line.contains("test_process_wide_logger_lifecycle")),
        "{content}"
    );
    assert!(!content.contains("nowhere to go"));
    assert!(!fs::read_to_string(&first).unwrap().contains("after switch"));
}
