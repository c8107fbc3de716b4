use thread_executor::spawn;
use thread_executor::spawn_fn;
use thread_executor::Result;
use thread_executor::TaskError;

#[test]
fn spawn_fn_returns_value() -> Result<()> {
    let handle = spawn_fn(|| 1 + 3)?;
    assert_eq!(handle.wait(), Ok(4));
    Ok(())
}

#[test]
fn spawn_returns_failure() -> Result<()> {
    let handle = spawn(|| Err::<(), _>("Boom"))?;
    assert_eq!(handle.wait(), Err(TaskError::Failed("Boom")));
    Ok(())
}

#[test]
fn spawn_captures_panic() -> Result<()> {
    let handle = spawn_fn(|| -> u8 {
        panic_control::disable_hook_in_current_thread();
        panic!("Boom");
    })?;
    assert_eq!(handle.wait(), Err(TaskError::Panicked(String::from("Boom"))));
    Ok(())
}
