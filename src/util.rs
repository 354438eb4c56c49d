/// tracing error log
/// 递归调用底层错误信息，显示完整错误链
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    write!(f, "{e}")?;
    let mut current = e.source();
    while let Some(cause) = current {
        write!(f, " Caused by: {cause}")?;
        current = cause.source();
    }
    Ok(())
}
