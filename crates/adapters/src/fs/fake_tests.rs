// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn seeded_files_can_be_read() {
    let fs = FakeFileSystem::new();
    fs.add_file("/etc/ccnet.toml", "[server]\n");

    let mut content = String::new();
    fs.open_file_for_read(Path::new("/etc/ccnet.toml"))
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "[server]\n");
}

#[test]
fn writes_are_visible_immediately() {
    let fs = FakeFileSystem::new();
    let path = Path::new("/logs/core/1.xml");
    let mut writer = fs.open_file_for_write(path).unwrap();
    writer.write_all(b"<integration/>").unwrap();

    assert!(fs.file_exists(path));
    assert_eq!(fs.contents(path).unwrap(), "<integration/>");
    assert_eq!(fs.paths(), vec![path.to_path_buf()]);
}

#[test]
fn missing_file_read_fails_and_is_recorded() {
    let fs = FakeFileSystem::new();
    assert!(fs.open_file_for_read(Path::new("/missing")).is_err());
    assert_eq!(fs.calls(), vec![FsCall::Read("/missing".into())]);
}
